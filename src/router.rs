use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::db::EmployeeStorage;
use crate::handlers::{employee, pages};
use crate::views::PageContext;

/// Application context handed to every handler.
///
/// `storage` is `None` only when the store connection was skipped
/// (`SKIP_DB_CONNECT`), in which case writes render the error marker and
/// lookups render "not found".
#[derive(Clone)]
pub struct DirectoryState {
    pub config: Arc<Config>,
    pub storage: Option<EmployeeStorage>,
}

impl DirectoryState {
    pub fn new(config: Arc<Config>, storage: Option<EmployeeStorage>) -> Self {
        Self { config, storage }
    }

    pub fn page(&self) -> PageContext {
        PageContext::from_config(&self.config)
    }
}

pub fn directory_router(state: DirectoryState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route(
            "/addemp",
            get(pages::add_employee_form).post(employee::add_employee),
        )
        .route("/getemp", get(pages::get_employee))
        .route("/fetchdata", post(employee::fetch_employee_data))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
