use askama::Template;
use axum::extract::{OriginalUri, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Redirect, Response};

/// Where a successful login lands when no usable `next` was given.
pub const DEFAULT_LANDING: &str = "/admin/";

#[derive(Template)]
#[template(path = "errors/forbidden.html")]
struct ForbiddenTemplate {
    path: String,
}

#[derive(Template)]
#[template(path = "errors/not_found.html")]
struct NotFoundTemplate {
    path: String,
}

/// Browser-facing admin routes: a 401 becomes a redirect to the login page
/// carrying the original path and query in `next`. 403 and 404 get HTML bodies.
pub async fn redirect_unauthorized(req: Request, next: Next) -> Response {
    let uri = req
        .extensions()
        .get::<OriginalUri>()
        .map(|o| o.0.clone())
        .unwrap_or_else(|| req.uri().clone());
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let response = next.run(req).await;
    match response.status() {
        StatusCode::UNAUTHORIZED => Redirect::to(&login_url(&target)).into_response(),
        StatusCode::FORBIDDEN => html_error(
            StatusCode::FORBIDDEN,
            &ForbiddenTemplate {
                path: uri.path().to_string(),
            },
        ),
        StatusCode::NOT_FOUND => html_error(
            StatusCode::NOT_FOUND,
            &NotFoundTemplate {
                path: uri.path().to_string(),
            },
        ),
        _ => response,
    }
}

fn html_error<T: Template>(status: StatusCode, page: &T) -> Response {
    match page.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render {status} page: {e}");
            status.into_response()
        }
    }
}

/// `/auth/login?next=<target>`, with `target` form-encoded.
pub fn login_url(target: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("next", target)
        .finish();
    format!("/auth/login?{query}")
}

/// Only same-site absolute paths are followed after login.
pub fn safe_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => DEFAULT_LANDING.to_string(),
    }
}
