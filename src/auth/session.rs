//! Issuing and clearing the session cookie.

use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;

use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password;
use crate::config::Config;
use crate::db;
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;
use crate::validation;

pub const SESSION_COOKIE: &str = "access_token";

pub fn session_cookie(token: &str, config: &Config) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(config.session_hours))
        .build();
    CookieJar::new().add(cookie)
}

pub fn clear_session_cookie() -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(cookie)
}

pub fn issue_token(user: &User, config: &Config) -> Result<String, AppError> {
    encode_token(&Claims::new(user.id, config.session_hours), &config.jwt_secret)
        .map_err(AppError::Internal)
}

/// Check credentials and return the user with a fresh session token.
/// Inactive accounts are refused with the same message as bad credentials.
pub async fn sign_in(
    state: &SharedState,
    email: &str,
    password: &str,
) -> Result<(User, String), AppError> {
    let email = email.trim().to_lowercase();

    if let Err(retry_after) = state.login_limiter.check(&email) {
        tracing::warn!(%email, retry_after, "Login throttled");
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let Some(user) = db::users::find_by_email(&state.pool, &email).await? else {
        state.login_limiter.record_failure(&email);
        tracing::warn!(%email, "Login failed: unknown email");
        return Err(invalid());
    };

    if !password::verify(password, &user.password_hash)? {
        state.login_limiter.record_failure(&email);
        tracing::warn!(%email, "Login failed: wrong password");
        return Err(invalid());
    }

    if !user.active {
        tracing::warn!(%email, "Login refused: account inactive");
        return Err(invalid());
    }

    let token = issue_token(&user, &state.config)?;
    tracing::info!(user_id = %user.id, "User signed in");
    Ok((user, token))
}

/// Cheap pre-check used by the form handlers before hashing anything.
pub fn credentials_present(email: &str, password: &str) -> Result<(), AppError> {
    validation::required("Email", email, 255)?;
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }
    Ok(())
}
