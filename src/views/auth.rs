use askama::Template;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::{CookieJar, Form};
use serde::Deserialize;

use crate::auth::extractor::MaybeUser;
use crate::auth::session::{self, clear_session_cookie, session_cookie};
use crate::error::AppError;
use crate::middleware::auth_redirect::safe_next;
use crate::state::SharedState;
use crate::views::render;

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    next: String,
    email: String,
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

pub async fn login_page(
    MaybeUser(user): MaybeUser,
    Query(q): Query<LoginQuery>,
) -> Result<Response, AppError> {
    let next = safe_next(q.next.as_deref());

    // Already signed in: go straight on.
    if user.is_some() {
        return Ok(Redirect::to(&next).into_response());
    }

    let page = LoginTemplate {
        next,
        email: String::new(),
        error: None,
    };
    Ok(render(&page)?.into_response())
}

pub async fn login_submit(
    State(state): State<SharedState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let next = safe_next(form.next.as_deref());

    let outcome = match session::credentials_present(&form.email, &form.password) {
        Ok(()) => session::sign_in(&state, &form.email, &form.password).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok((_, token)) => {
            let jar = session_cookie(&token, &state.config);
            Ok((jar, Redirect::to(&next)).into_response())
        }
        Err(
            e @ (AppError::Unauthorized(_) | AppError::BadRequest(_) | AppError::RateLimited(_)),
        ) => {
            let status = e.status();
            let page = LoginTemplate {
                next,
                email: form.email,
                error: Some(e.public_message()),
            };
            Ok((status, render(&page)?).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let signed_in = jar.get(session::SESSION_COOKIE).is_some();
    if signed_in {
        tracing::info!("User signed out");
    }
    (clear_session_cookie(), Redirect::to("/"))
}
