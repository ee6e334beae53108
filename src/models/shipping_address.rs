use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::product;
use crate::validation;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub id: Uuid,
    pub country: String,
    pub city: String,
    pub street: String,
    pub building: String,
    pub product_id: Uuid,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ShippingAddressListing {
    pub id: Uuid,
    pub country: String,
    pub city: String,
    pub street: String,
    pub building: String,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_color: String,
    pub product_weight: String,
    pub product_price: String,
}

impl ShippingAddressListing {
    pub fn product_label(&self) -> String {
        product::label(
            &self.product_name,
            &self.product_color,
            &self.product_weight,
            &self.product_price,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShippingAddressInput {
    pub country: String,
    pub city: String,
    pub street: String,
    pub building: String,
    pub product_id: Uuid,
}

impl ShippingAddressInput {
    pub fn validated(self) -> Result<Self, AppError> {
        Ok(ShippingAddressInput {
            country: validation::required("Country", &self.country, 100)?,
            city: validation::required("City", &self.city, 100)?,
            street: validation::required("Street", &self.street, 100)?,
            building: validation::required("Building", &self.building, 100)?,
            product_id: self.product_id,
        })
    }
}
