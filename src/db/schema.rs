//! SQL DDL for the employee table.
//! Production databases are provisioned externally; this is applied by tests
//! and local SQLite runs only.

/// Portable across MySQL and SQLite:
/// - `emp_id` is the lookup key but carries no UNIQUE constraint
/// - every column is nullable text
pub const EMPLOYEE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS employee (
    emp_id VARCHAR(20),
    first_name VARCHAR(20),
    last_name VARCHAR(20),
    primary_skill VARCHAR(20),
    location VARCHAR(20)
);
"#;
