//! Render-only pages; none of these touch the store.

use axum::{extract::State, response::Html};

use crate::error::DirectoryError;
use crate::router::DirectoryState;
use crate::views::{AboutTemplate, AddEmployeeTemplate, GetEmployeeTemplate, render};

/// GET / -> the add-employee form.
pub async fn home(State(state): State<DirectoryState>) -> Result<Html<String>, DirectoryError> {
    render(&AddEmployeeTemplate { page: state.page() })
}

/// GET /addemp -> same form as the home page.
pub async fn add_employee_form(
    State(state): State<DirectoryState>,
) -> Result<Html<String>, DirectoryError> {
    render(&AddEmployeeTemplate { page: state.page() })
}

pub async fn about(State(state): State<DirectoryState>) -> Result<Html<String>, DirectoryError> {
    render(&AboutTemplate { page: state.page() })
}

/// GET /getemp -> the lookup form.
pub async fn get_employee(
    State(state): State<DirectoryState>,
) -> Result<Html<String>, DirectoryError> {
    render(&GetEmployeeTemplate { page: state.page() })
}
