//! Page models and their Askama templates.
//!
//! Every page shares a [`PageContext`] carrying the accent color, group name,
//! slogan and background image URL.

use askama::Template;
use axum::response::Html;

use crate::config::Config;
use crate::db::Employee;
use crate::error::DirectoryError;

/// Placeholder shown for every field when a lookup yields nothing.
pub const NOT_FOUND: &str = "N/A";

/// Name shown on the confirmation page when the insert failed.
pub const INSERT_ERROR_NAME: &str = "Error";

#[derive(Debug, Clone)]
pub struct PageContext {
    pub color: &'static str,
    pub group_name: String,
    pub group_slogan: String,
    pub background: String,
}

impl PageContext {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            color: cfg.app_color.hex(),
            group_name: cfg.group_name.clone(),
            group_slogan: cfg.group_slogan.clone(),
            background: format!("/static/{}", cfg.background_image),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub primary_skill: String,
    pub location: String,
}

impl EmployeeView {
    pub fn not_found() -> Self {
        Self {
            id: NOT_FOUND.to_string(),
            first_name: NOT_FOUND.to_string(),
            last_name: NOT_FOUND.to_string(),
            primary_skill: NOT_FOUND.to_string(),
            location: NOT_FOUND.to_string(),
        }
    }
}

impl From<Employee> for EmployeeView {
    fn from(e: Employee) -> Self {
        Self {
            id: e.emp_id,
            first_name: e.first_name,
            last_name: e.last_name,
            primary_skill: e.primary_skill,
            location: e.location,
        }
    }
}

#[derive(Template)]
#[template(path = "addemp.html")]
pub struct AddEmployeeTemplate {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "addempoutput.html")]
pub struct AddEmployeeOutputTemplate {
    pub page: PageContext,
    pub name: String,
}

#[derive(Template)]
#[template(path = "getemp.html")]
pub struct GetEmployeeTemplate {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "getempoutput.html")]
pub struct GetEmployeeOutputTemplate {
    pub page: PageContext,
    pub employee: EmployeeView,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub page: PageContext,
}

pub fn render<T: Template>(tmpl: &T) -> Result<Html<String>, DirectoryError> {
    Ok(Html(tmpl.render()?))
}
