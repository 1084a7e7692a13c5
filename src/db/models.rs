use serde::Deserialize;

/// Fields submitted by the add-employee form. Missing fields are stored as NULL.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewEmployee {
    pub emp_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub primary_skill: Option<String>,
    pub location: Option<String>,
}

impl NewEmployee {
    /// Name shown on the confirmation page.
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
    }
}

/// One row of the `employee` table; NULL columns read back as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Employee {
    pub emp_id: String,
    pub first_name: String,
    pub last_name: String,
    pub primary_skill: String,
    pub location: String,
}
