use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::AdminUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Role, RoleInput};
use crate::routes::{MessageResponse, Page, PageQuery};
use crate::services::{self, not_found};
use crate::state::SharedState;

pub async fn list(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Role>>, AppError> {
    let params = query.params(state.config.page_size);
    let roles = db::roles::list(&state.pool, &params).await?;
    let total = db::roles::count(&state.pool).await?;
    Ok(Json(Page::new(roles, total, query.page(), params.limit)))
}

pub async fn get(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Role>, AppError> {
    let role = db::roles::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Role"))?;
    Ok(Json(role))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Json(input): Json<RoleInput>,
) -> Result<Json<Role>, AppError> {
    Ok(Json(services::roles::save(&state, None, input).await?))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(input): Json<RoleInput>,
) -> Result<Json<Role>, AppError> {
    Ok(Json(services::roles::save(&state, Some(id), input).await?))
}

pub async fn delete(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    services::roles::remove(&state, id).await?;
    Ok(Json(MessageResponse::deleted()))
}
