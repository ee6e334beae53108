//! Create, update and delete for each model, shared by the HTML admin and
//! the JSON API. Inputs are validated here and constraint violations are
//! turned into client errors.

pub mod products;
pub mod roles;
pub mod shipping_addresses;
pub mod users;

use crate::error::AppError;

pub(crate) fn not_found(what: &str) -> AppError {
    AppError::NotFound(format!("{what} not found"))
}
