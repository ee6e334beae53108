use axum::extract::State;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::session::{self, clear_session_cookie, session_cookie};
use crate::error::AppError;
use crate::models::User;
use crate::routes::MessageResponse;
use crate::services;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

/// Bootstrap registration: only the very first account can sign up.
pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let user = services::users::bootstrap(&state, &req.email, &req.password).await?;
    let access_token = session::issue_token(&user, &state.config)?;

    Ok((
        session_cookie(&access_token, &state.config),
        Json(AuthResponse { access_token, user }),
    ))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    session::credentials_present(&req.email, &req.password)?;
    let (user, access_token) = session::sign_in(&state, &req.email, &req.password).await?;

    Ok((
        session_cookie(&access_token, &state.config),
        Json(AuthResponse { access_token, user }),
    ))
}

pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (
        clear_session_cookie(),
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}
