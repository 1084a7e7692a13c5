//! Form handlers that read or write the `employee` table.
//!
//! Store failures never reach the client as errors: a failed insert renders
//! the literal name `Error`, and a failed lookup renders the same all-`N/A`
//! page as an unknown id.

use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::Html,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::db::NewEmployee;
use crate::error::DirectoryError;
use crate::router::DirectoryState;
use crate::views::{
    AddEmployeeOutputTemplate, EmployeeView, GetEmployeeOutputTemplate, INSERT_ERROR_NAME, render,
};

#[derive(Debug, Default, Deserialize)]
pub struct FetchEmployeeForm {
    pub emp_id: Option<String>,
}

/// POST /addemp
pub async fn add_employee(
    State(state): State<DirectoryState>,
    form: Result<Form<NewEmployee>, FormRejection>,
) -> Result<Html<String>, DirectoryError> {
    let emp = match form {
        Ok(Form(emp)) => emp,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable add-employee form; treating fields as missing");
            NewEmployee::default()
        }
    };

    let name = match &state.storage {
        Some(storage) => match storage.insert(&emp).await {
            Ok(()) => {
                let name = emp.display_name();
                info!(employee = %name, "employee added");
                name
            }
            Err(e) => {
                error!(error = %e, "inserting employee failed");
                INSERT_ERROR_NAME.to_string()
            }
        },
        None => {
            error!("inserting employee failed: store connection was skipped");
            INSERT_ERROR_NAME.to_string()
        }
    };

    render(&AddEmployeeOutputTemplate {
        page: state.page(),
        name,
    })
}

/// POST /fetchdata
pub async fn fetch_employee_data(
    State(state): State<DirectoryState>,
    form: Result<Form<FetchEmployeeForm>, FormRejection>,
) -> Result<Html<String>, DirectoryError> {
    let emp_id = form
        .map(|Form(f)| f)
        .unwrap_or_default()
        .emp_id
        .filter(|id| !id.is_empty());

    let employee = match emp_id {
        None => {
            info!("no employee id provided");
            EmployeeView::not_found()
        }
        Some(emp_id) => lookup(&state, &emp_id).await,
    };

    render(&GetEmployeeOutputTemplate {
        page: state.page(),
        employee,
    })
}

async fn lookup(state: &DirectoryState, emp_id: &str) -> EmployeeView {
    let Some(storage) = &state.storage else {
        error!(emp_id, "fetching employee failed: store connection was skipped");
        return EmployeeView::not_found();
    };

    match storage.find_by_id(emp_id).await {
        Ok(Some(employee)) => employee.into(),
        Ok(None) => {
            info!(emp_id, "employee not found");
            EmployeeView::not_found()
        }
        Err(e) => {
            error!(emp_id, error = %e, "fetching employee failed");
            EmployeeView::not_found()
        }
    }
}
