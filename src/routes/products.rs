use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::AdminUser;
use crate::db;
use crate::error::AppError;
use crate::models::{ProductInput, ProductListing};
use crate::routes::{MessageResponse, Page, PageQuery};
use crate::services::{self, not_found};
use crate::state::SharedState;

pub async fn list(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ProductListing>>, AppError> {
    let params = query.params(state.config.page_size);
    let products = db::products::list(&state.pool, &params).await?;
    let total = db::products::count(&state.pool).await?;
    Ok(Json(Page::new(products, total, query.page(), params.limit)))
}

pub async fn get(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductListing>, AppError> {
    let product = db::products::find_listing(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Product"))?;
    Ok(Json(product))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductListing>, AppError> {
    Ok(Json(services::products::save(&state, None, input).await?))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductListing>, AppError> {
    Ok(Json(services::products::save(&state, Some(id), input).await?))
}

pub async fn delete(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    services::products::remove(&state, id).await?;
    Ok(Json(MessageResponse::deleted()))
}
