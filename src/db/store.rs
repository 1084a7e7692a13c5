use crate::db::models::{Employee, NewEmployee};
use crate::db::schema::EMPLOYEE_INIT;
use crate::error::DirectoryError;
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Connection, Row};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

/// The single store connection opened at startup, shared by every request.
type SharedConnection = Arc<Mutex<AnyConnection>>;

const INSERT_EMPLOYEE: &str = r#"
    INSERT INTO employee (emp_id, first_name, last_name, primary_skill, location)
    VALUES (?, ?, ?, ?, ?)
"#;

// emp_id is cast so numeric and textual key columns both decode as text.
const SELECT_EMPLOYEE: &str = r#"
    SELECT CAST(emp_id AS CHAR) AS emp_id, first_name, last_name, primary_skill, location
    FROM employee WHERE emp_id = ?
"#;

#[derive(Clone)]
pub struct EmployeeStorage {
    conn: SharedConnection,
}

impl EmployeeStorage {
    pub fn new(conn: AnyConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), DirectoryError> {
        let mut conn = self.conn.lock().await;
        for stmt in EMPLOYEE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&mut *conn).await?;
        }
        Ok(())
    }

    /// Insert one employee inside a transaction; rolled back on failure.
    pub async fn insert(&self, emp: &NewEmployee) -> Result<(), DirectoryError> {
        let mut conn = self.conn.lock().await;
        let mut tx = conn.begin().await?;

        let inserted = sqlx::query(INSERT_EMPLOYEE)
            .bind(emp.emp_id.clone())
            .bind(emp.first_name.clone())
            .bind(emp.last_name.clone())
            .bind(emp.primary_skill.clone())
            .bind(emp.location.clone())
            .execute(&mut *tx)
            .await;

        match inserted {
            Ok(_) => {
                tx.commit().await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "rollback after failed insert also failed");
                }
                Err(e.into())
            }
        }
    }

    /// First row whose `emp_id` equals `emp_id`, if any.
    pub async fn find_by_id(&self, emp_id: &str) -> Result<Option<Employee>, DirectoryError> {
        let mut conn = self.conn.lock().await;
        let row = sqlx::query(SELECT_EMPLOYEE)
            .bind(emp_id.to_string())
            .fetch_optional(&mut *conn)
            .await?;
        row.map(Self::row_to_model).transpose()
    }

    fn row_to_model(row: AnyRow) -> Result<Employee, DirectoryError> {
        let text = |col: &str| -> Result<String, DirectoryError> {
            let v: Option<String> = row.try_get(col)?;
            Ok(v.unwrap_or_default())
        };
        Ok(Employee {
            emp_id: text("emp_id")?,
            first_name: text("first_name")?,
            last_name: text("last_name")?,
            primary_skill: text("primary_skill")?,
            location: text("location")?,
        })
    }
}
