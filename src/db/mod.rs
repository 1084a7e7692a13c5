//! Database module: the employee table and the shared connection wrapper.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring employee rows and form input
//! - `schema.rs`: SQL DDL for the `employee` table
//! - `store.rs`: statements executed over the single shared connection

pub mod models;
pub mod schema;
pub mod store;

pub use models::{Employee, NewEmployee};
pub use schema::EMPLOYEE_INIT;
pub use store::EmployeeStorage;
