use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::{ProductInput, ProductListing};
use crate::services::not_found;
use crate::state::SharedState;

pub async fn save(
    state: &SharedState,
    id: Option<Uuid>,
    input: ProductInput,
) -> Result<ProductListing, AppError> {
    let input = input.validated()?;

    if db::users::find_by_id(&state.pool, input.user_id).await?.is_none() {
        return Err(AppError::BadRequest("Owner does not exist".to_string()));
    }

    let result = match id {
        None => db::products::create(&state.pool, &input).await,
        Some(id) => db::products::update(&state.pool, id, &input).await,
    };
    let product = result
        .map_err(|e| AppError::from_constraint(e, "Duplicate product", "Owner does not exist"))?;

    match id {
        None => tracing::info!(product_id = %product.id, "Product created"),
        Some(_) => tracing::info!(product_id = %product.id, "Product updated"),
    }

    db::products::find_listing(&state.pool, product.id)
        .await?
        .ok_or_else(|| not_found("Product"))
}

/// Blocked while a shipping address still points at the product.
pub async fn remove(state: &SharedState, id: Uuid) -> Result<(), AppError> {
    let deleted = db::products::delete(&state.pool, id).await.map_err(|e| {
        AppError::from_constraint(
            e,
            "Product cannot be deleted",
            "Product has a shipping address; delete the address first",
        )
    })?;
    if deleted == 0 {
        return Err(not_found("Product"));
    }
    tracing::info!(product_id = %id, "Product deleted");
    Ok(())
}
