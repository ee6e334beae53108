use sqlx::PgPool;
use uuid::Uuid;

use crate::db::ListParams;
use crate::models::{Product, ProductInput, ProductListing};

const LISTING_SELECT: &str = "SELECT p.id, p.name, p.color, p.weight, p.price, p.created_at,
        p.user_id, u.email AS owner_email, a.id AS shipping_address_id
     FROM products p
     JOIN users u ON u.id = p.user_id
     LEFT JOIN shipping_addresses a ON a.product_id = p.id";

const SORTABLE: &[(&str, &str)] = &[
    ("name", "p.name"),
    ("color", "p.color"),
    ("weight", "p.weight"),
    ("price", "p.price"),
    ("created_at", "p.created_at"),
    ("owner", "u.email"),
];

pub async fn list(pool: &PgPool, params: &ListParams) -> Result<Vec<ProductListing>, sqlx::Error> {
    let order = params.order_by(SORTABLE, "p.created_at", "p.id");
    sqlx::query_as::<_, ProductListing>(&format!(
        "{LISTING_SELECT} ORDER BY {order} LIMIT $1 OFFSET $2"
    ))
    .bind(params.limit)
    .bind(params.offset)
    .fetch_all(pool)
    .await
}

/// Every product, for the address form's product picker.
pub async fn list_all(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name, created_at")
        .fetch_all(pool)
        .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_listing(pool: &PgPool, id: Uuid) -> Result<Option<ProductListing>, sqlx::Error> {
    sqlx::query_as::<_, ProductListing>(&format!("{LISTING_SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, input: &ProductInput) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, color, weight, price, user_id)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.color)
    .bind(&input.weight)
    .bind(&input.price)
    .bind(input.user_id)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, input: &ProductInput) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "UPDATE products SET name = $2, color = $3, weight = $4, price = $5, user_id = $6
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.color)
    .bind(&input.weight)
    .bind(&input.price)
    .bind(input.user_id)
    .fetch_one(pool)
    .await
}

/// Fails with a foreign-key violation while a shipping address points here.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
