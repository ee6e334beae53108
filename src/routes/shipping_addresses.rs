use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::AdminUser;
use crate::db;
use crate::error::AppError;
use crate::models::{ShippingAddressInput, ShippingAddressListing};
use crate::routes::{MessageResponse, Page, PageQuery};
use crate::search::{AddressQuery, AddressSearchParams};
use crate::services::{self, not_found};
use crate::state::SharedState;

/// Accepts the same `search`, `flt_*` and `op_*` parameters as the HTML list.
pub async fn list(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
    Query(search): Query<AddressSearchParams>,
) -> Result<Json<Page<ShippingAddressListing>>, AppError> {
    let search = AddressQuery::from_params(&search)?;
    let params = query.params(state.config.page_size);
    let addresses = db::shipping_addresses::list(&state.pool, &search, &params).await?;
    let total = db::shipping_addresses::count(&state.pool, &search).await?;
    Ok(Json(Page::new(addresses, total, query.page(), params.limit)))
}

pub async fn get(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShippingAddressListing>, AppError> {
    let address = db::shipping_addresses::find_listing(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Shipping address"))?;
    Ok(Json(address))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Json(input): Json<ShippingAddressInput>,
) -> Result<Json<ShippingAddressListing>, AppError> {
    Ok(Json(services::shipping_addresses::save(&state, None, input).await?))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ShippingAddressInput>,
) -> Result<Json<ShippingAddressListing>, AppError> {
    Ok(Json(services::shipping_addresses::save(&state, Some(id), input).await?))
}

pub async fn delete(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    services::shipping_addresses::remove(&state, id).await?;
    Ok(Json(MessageResponse::deleted()))
}
