use askama::Template;
use axum::response::IntoResponse;

use crate::auth::extractor::MaybeUser;
use crate::error::AppError;
use crate::views::render;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    current_email: Option<String>,
}

pub async fn index(MaybeUser(user): MaybeUser) -> Result<impl IntoResponse, AppError> {
    render(&IndexTemplate {
        current_email: user.map(|u| u.email),
    })
}
