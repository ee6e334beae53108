use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::validation;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub weight: String,
    pub price: String,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&label(&self.name, &self.color, &self.weight, &self.price))
    }
}

/// `name: color, weight (price)`
pub fn label(name: &str, color: &str, weight: &str, price: &str) -> String {
    format!("{name}: {color}, {weight} ({price})")
}

/// Product row joined with its owner and address, for list pages.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ProductListing {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub weight: String,
    pub price: String,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub owner_email: String,
    pub shipping_address_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub color: String,
    pub weight: String,
    pub price: String,
    pub user_id: Uuid,
}

impl ProductInput {
    pub fn validated(self) -> Result<Self, AppError> {
        Ok(ProductInput {
            name: validation::required("Name", &self.name, 255)?,
            color: validation::required("Color", &self.color, 100)?,
            weight: validation::required("Weight", &self.weight, 100)?,
            price: validation::required("Price", &self.price, 100)?,
            user_id: self.user_id,
        })
    }
}
