use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::{ShippingAddressInput, ShippingAddressListing};
use crate::services::not_found;
use crate::state::SharedState;

pub async fn save(
    state: &SharedState,
    id: Option<Uuid>,
    input: ShippingAddressInput,
) -> Result<ShippingAddressListing, AppError> {
    let input = input.validated()?;

    if db::products::find_by_id(&state.pool, input.product_id).await?.is_none() {
        return Err(AppError::BadRequest("Product does not exist".to_string()));
    }

    let result = match id {
        None => db::shipping_addresses::create(&state.pool, &input).await,
        Some(id) => db::shipping_addresses::update(&state.pool, id, &input).await,
    };
    let address = result.map_err(|e| {
        AppError::from_constraint(
            e,
            "This product already has a shipping address",
            "Product does not exist",
        )
    })?;

    match id {
        None => tracing::info!(address_id = %address.id, product_id = %address.product_id, "Shipping address created"),
        Some(_) => tracing::info!(address_id = %address.id, "Shipping address updated"),
    }

    db::shipping_addresses::find_listing(&state.pool, address.id)
        .await?
        .ok_or_else(|| not_found("Shipping address"))
}

pub async fn remove(state: &SharedState, id: Uuid) -> Result<(), AppError> {
    let deleted = db::shipping_addresses::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(not_found("Shipping address"));
    }
    tracing::info!(address_id = %id, "Shipping address deleted");
    Ok(())
}
