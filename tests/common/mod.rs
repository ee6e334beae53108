#![allow(dead_code)]

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use ecommerce_admin::config::Config;

pub const ADMIN_EMAIL: &str = "admin@shop.test";
pub const ADMIN_PASSWORD: &str = "password123";

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: std::net::SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

/// Status, `Location` header and body text of an HTML response.
pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Page {
    async fn from_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.text().await.unwrap_or_default();
        Page {
            status,
            location,
            body,
        }
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Register the bootstrap user (first user = superuser).
    pub async fn register(&self, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/auth/register"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("register request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Login and return the auth response body + status.
    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Register the bootstrap superuser, return its access token.
    pub async fn bootstrap(&self) -> String {
        let (body, status) = self.register(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "bootstrap register failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Create a user through the admin API, return the user JSON.
    pub async fn create_user(&self, token: &str, email: &str, active: bool, roles: &[&str]) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/v1/admin/users",
                token,
                &json!({
                    "email": email,
                    "password": "password123",
                    "active": active,
                    "roles": roles,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create user failed: {body}");
        body
    }

    /// Create an active user without any role and return its token.
    pub async fn plain_user_token(&self, admin_token: &str, email: &str) -> String {
        self.create_user(admin_token, email, true, &[]).await;
        let (body, status) = self.login(email, "password123").await;
        assert_eq!(status, StatusCode::OK, "plain user login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn create_product(&self, token: &str, name: &str, owner_id: &str) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/v1/admin/products",
                token,
                &json!({
                    "name": name,
                    "color": "red",
                    "weight": "1kg",
                    "price": "9.99",
                    "user_id": owner_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create product failed: {body}");
        body
    }

    pub async fn create_address(&self, token: &str, product_id: &str, country: &str, city: &str) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/v1/admin/shipping-addresses",
                token,
                &json!({
                    "country": country,
                    "city": city,
                    "street": "Main Street",
                    "building": "1",
                    "product_id": product_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create address failed: {body}");
        body
    }

    /// Id of the bootstrap superuser.
    pub async fn admin_id(&self) -> String {
        let id: Uuid = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(ADMIN_EMAIL)
            .fetch_one(&self.pool)
            .await
            .expect("admin lookup failed");
        id.to_string()
    }

    /// Every row of every table, as text. Two equal snapshots mean nothing
    /// was written in between.
    pub async fn snapshot(&self) -> String {
        let mut out = String::new();
        for table in ["roles", "users", "roles_users", "products", "shipping_addresses"] {
            let rows: Option<String> = sqlx::query_scalar(&format!(
                "SELECT json_agg(t ORDER BY t::text)::text FROM {table} t"
            ))
            .fetch_one(&self.pool)
            .await
            .expect("snapshot query failed");
            out.push_str(table);
            out.push_str(": ");
            out.push_str(&rows.unwrap_or_default());
            out.push('\n');
        }
        out
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated POST request with JSON body.
    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated PUT request with JSON body.
    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated DELETE request.
    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Browser-style GET, carrying the session cookie when a token is given.
    pub async fn get_page(&self, path: &str, token: Option<&str>) -> Page {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.header("cookie", format!("access_token={token}"));
        }
        Page::from_response(req.send().await.expect("page request failed")).await
    }

    /// Browser-style form POST, carrying the session cookie when a token is given.
    pub async fn post_form(&self, path: &str, token: Option<&str>, form: &[(&str, &str)]) -> Page {
        let mut req = self.client.post(self.url(path)).form(form);
        if let Some(token) = token {
            req = req.header("cookie", format!("access_token={token}"));
        }
        Page::from_response(req.send().await.expect("form request failed")).await
    }
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!("ecommerce_test_{}", Uuid::now_v7().to_string().replace('-', ""));

    // Connect to default postgres DB to create test DB
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    // Connect to test DB and run migrations
    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: test_url,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        session_hours: 1,
        secure_cookies: false,
        page_size: 20,
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
    };

    let (app, _state) = ecommerce_admin::build_app(pool.clone(), config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
