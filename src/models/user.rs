use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::validation;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.email)
    }
}

/// A user together with the names of the roles it holds.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub active: bool,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub roles: Vec<String>,
    pub product_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub email: String,
    /// Required on create. On update, `None` keeps the stored hash.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub roles: Vec<String>,
}

fn default_active() -> bool {
    true
}

impl UserInput {
    pub fn validated(self, creating: bool) -> Result<Self, AppError> {
        let password = match self.password.filter(|p| !p.is_empty()) {
            Some(p) => Some(validation::password(&p)?),
            None if creating => {
                return Err(AppError::BadRequest("Password is required".to_string()));
            }
            None => None,
        };

        let mut roles: Vec<String> = self
            .roles
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        roles.sort();
        roles.dedup();

        Ok(UserInput {
            email: validation::email(&self.email)?,
            password,
            active: self.active,
            confirmed_at: self.confirmed_at,
            roles,
        })
    }
}
