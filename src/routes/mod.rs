pub mod auth;
pub mod products;
pub mod roles;
pub mod shipping_addresses;
pub mod users;

use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::db::ListParams;
use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        // Roles
        .route("/api/v1/admin/roles", get(roles::list).post(roles::create))
        .route(
            "/api/v1/admin/roles/{id}",
            get(roles::get).put(roles::update).delete(roles::delete),
        )
        // Users
        .route("/api/v1/admin/users", get(users::list).post(users::create))
        .route(
            "/api/v1/admin/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        // Products
        .route("/api/v1/admin/products", get(products::list).post(products::create))
        .route(
            "/api/v1/admin/products/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        // Shipping addresses
        .route(
            "/api/v1/admin/shipping-addresses",
            get(shipping_addresses::list).post(shipping_addresses::create),
        )
        .route(
            "/api/v1/admin/shipping-addresses/{id}",
            get(shipping_addresses::get)
                .put(shipping_addresses::update)
                .delete(shipping_addresses::delete),
        )
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort: Option<String>,
    pub desc: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn descending(&self) -> bool {
        matches!(self.desc.as_deref(), Some("1" | "true"))
    }

    /// Requested page size, capped at 100; falls back to the configured default.
    pub fn per_page(&self, default: i64) -> i64 {
        self.per_page.unwrap_or(default).clamp(1, 100)
    }

    pub fn params(&self, default_per_page: i64) -> ListParams {
        ListParams::new(self.page(), self.per_page(default_per_page))
            .sorted(self.sort.clone(), self.descending())
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        Self {
            items,
            total,
            page,
            per_page,
            total_pages: ((total + per_page - 1) / per_page).max(1),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn deleted() -> Self {
        Self {
            message: "Deleted".to_string(),
        }
    }
}
