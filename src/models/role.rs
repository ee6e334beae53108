use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::validation;

/// Name of the only role allowed into the admin interface.
pub const SUPERUSER: &str = "superuser";

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl RoleInput {
    pub fn validated(self) -> Result<Self, AppError> {
        Ok(RoleInput {
            name: validation::required("Name", &self.name, 80)?,
            description: validation::optional("Description", self.description.as_deref(), 255)?,
        })
    }
}
