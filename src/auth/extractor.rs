use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::gate::{self, Access, Principal};
use crate::auth::jwt;
use crate::auth::session::SESSION_COOKIE;
use crate::db;
use crate::error::AppError;
use crate::models::role::SUPERUSER;
use crate::state::SharedState;

/// Bearer header first, then the session cookie.
fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(token) = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(token.trim().to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve whoever the request is signed in as. Bad or expired tokens and
/// deleted users resolve to `None`.
pub async fn resolve_principal(
    parts: &Parts,
    state: &SharedState,
) -> Result<Option<Principal>, AppError> {
    let Some(token) = token_from_parts(parts) else {
        return Ok(None);
    };
    let Ok(claims) = jwt::decode_token(&token, &state.config.jwt_secret) else {
        tracing::debug!("Ignoring invalid or expired session token");
        return Ok(None);
    };
    let Some(user) = db::users::find_by_id(&state.pool, claims.sub).await? else {
        return Ok(None);
    };
    let is_superuser = db::users::has_role(&state.pool, user.id, SUPERUSER).await?;

    Ok(Some(Principal {
        user_id: user.id,
        email: user.email,
        active: user.active,
        is_superuser,
    }))
}

/// Extractor for every admin handler: an active user holding `superuser`.
///
/// Rejects with `Unauthorized` when nobody usable is signed in and with
/// `Forbidden` when the role is missing. The HTML router turns the former
/// into a login redirect.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Principal);

impl FromRequestParts<SharedState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let principal = resolve_principal(parts, state).await?;

        match gate::decide(principal.as_ref()) {
            Access::Granted => principal
                .map(AdminUser)
                .ok_or_else(|| AppError::Internal("Granted access without a principal".to_string())),
            Access::Login => Err(AppError::Unauthorized(
                "Authentication required".to_string(),
            )),
            Access::Forbidden => {
                if let Some(p) = &principal {
                    tracing::warn!(user_id = %p.user_id, path = %parts.uri.path(), "Admin access denied");
                }
                Err(AppError::Forbidden("Superuser role required".to_string()))
            }
        }
    }
}

/// The active signed-in user, if any. Never rejects.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Principal>);

impl FromRequestParts<SharedState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let principal = resolve_principal(parts, state)
            .await?
            .filter(|p| p.active);
        Ok(MaybeUser(principal))
    }
}
