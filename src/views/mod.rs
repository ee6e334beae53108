pub mod admin;
pub mod auth;
pub mod home;

use askama::Template;
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::Router;

use crate::error::AppError;
use crate::state::SharedState;

/// Public pages: index and the login/logout flow.
pub fn public_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(home::index))
        .route("/auth/login", get(auth::login_page).post(auth::login_submit))
        .route("/auth/logout", get(auth::logout))
}

/// Browser admin. Every handler here takes `AdminUser`; wrap with
/// `redirect_unauthorized` when mounting.
pub fn admin_routes() -> Router<SharedState> {
    Router::new()
        .route("/admin", get(|| async { Redirect::permanent("/admin/") }))
        .route("/admin/", get(admin::index))
        // Roles
        .route("/admin/role/", get(admin::roles::list))
        .route("/admin/role/new", get(admin::roles::new_form).post(admin::roles::create))
        .route("/admin/role/{id}/edit", get(admin::roles::edit_form).post(admin::roles::update))
        .route("/admin/role/{id}/delete", post(admin::roles::delete))
        // Users
        .route("/admin/user/", get(admin::users::list))
        .route("/admin/user/new", get(admin::users::new_form).post(admin::users::create))
        .route("/admin/user/{id}/edit", get(admin::users::edit_form).post(admin::users::update))
        .route("/admin/user/{id}/delete", post(admin::users::delete))
        // Products
        .route("/admin/product/", get(admin::products::list))
        .route("/admin/product/new", get(admin::products::new_form).post(admin::products::create))
        .route("/admin/product/{id}/edit", get(admin::products::edit_form).post(admin::products::update))
        .route("/admin/product/{id}/delete", post(admin::products::delete))
        // Shipping addresses
        .route("/admin/shippingaddress/", get(admin::shipping_addresses::list))
        .route(
            "/admin/shippingaddress/new",
            get(admin::shipping_addresses::new_form).post(admin::shipping_addresses::create),
        )
        .route(
            "/admin/shippingaddress/{id}/edit",
            get(admin::shipping_addresses::edit_form).post(admin::shipping_addresses::update),
        )
        .route(
            "/admin/shippingaddress/{id}/delete",
            post(admin::shipping_addresses::delete),
        )
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template render failed: {e}")))
}
