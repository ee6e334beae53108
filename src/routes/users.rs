use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::AdminUser;
use crate::db;
use crate::error::AppError;
use crate::models::{UserInput, UserSummary};
use crate::routes::{MessageResponse, Page, PageQuery};
use crate::services::{self, not_found};
use crate::state::SharedState;

pub async fn list(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<UserSummary>>, AppError> {
    let params = query.params(state.config.page_size);
    let users = db::users::list(&state.pool, &params).await?;
    let total = db::users::count_all(&state.pool).await?;
    Ok(Json(Page::new(users, total, query.page(), params.limit)))
}

pub async fn get(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserSummary>, AppError> {
    let user = db::users::find_summary(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("User"))?;
    Ok(Json(user))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Json(input): Json<UserInput>,
) -> Result<Json<UserSummary>, AppError> {
    Ok(Json(services::users::save(&state, None, input).await?))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UserInput>,
) -> Result<Json<UserSummary>, AppError> {
    Ok(Json(services::users::save(&state, Some(id), input).await?))
}

pub async fn delete(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    services::users::remove(&state, admin.user_id, id).await?;
    Ok(Json(MessageResponse::deleted()))
}
