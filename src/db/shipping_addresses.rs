use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::ListParams;
use crate::models::{ShippingAddress, ShippingAddressInput, ShippingAddressListing};
use crate::search::AddressQuery;

const LISTING_SELECT: &str = "SELECT a.id, a.country, a.city, a.street, a.building, a.product_id,
        p.name AS product_name, p.color AS product_color,
        p.weight AS product_weight, p.price AS product_price
     FROM shipping_addresses a
     JOIN products p ON p.id = a.product_id";

const SORTABLE: &[(&str, &str)] = &[
    ("country", "a.country"),
    ("city", "a.city"),
    ("street", "a.street"),
    ("building", "a.building"),
    ("product", "p.name"),
];

pub async fn list(
    pool: &PgPool,
    query: &AddressQuery,
    params: &ListParams,
) -> Result<Vec<ShippingAddressListing>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new(LISTING_SELECT);
    query.push_where(&mut qb);
    qb.push(" ORDER BY ")
        .push(params.order_by(SORTABLE, "a.country", "a.id"))
        .push(" LIMIT ")
        .push_bind(params.limit)
        .push(" OFFSET ")
        .push_bind(params.offset);

    qb.build_query_as::<ShippingAddressListing>()
        .fetch_all(pool)
        .await
}

pub async fn count(pool: &PgPool, query: &AddressQuery) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM shipping_addresses a");
    query.push_where(&mut qb);
    let row: (i64,) = qb.build_query_as().fetch_one(pool).await?;
    Ok(row.0)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ShippingAddress>, sqlx::Error> {
    sqlx::query_as::<_, ShippingAddress>("SELECT * FROM shipping_addresses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_listing(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ShippingAddressListing>, sqlx::Error> {
    sqlx::query_as::<_, ShippingAddressListing>(&format!("{LISTING_SELECT} WHERE a.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    input: &ShippingAddressInput,
) -> Result<ShippingAddress, sqlx::Error> {
    sqlx::query_as::<_, ShippingAddress>(
        "INSERT INTO shipping_addresses (country, city, street, building, product_id)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(&input.country)
    .bind(&input.city)
    .bind(&input.street)
    .bind(&input.building)
    .bind(input.product_id)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &ShippingAddressInput,
) -> Result<ShippingAddress, sqlx::Error> {
    sqlx::query_as::<_, ShippingAddress>(
        "UPDATE shipping_addresses
         SET country = $2, city = $3, street = $4, building = $5, product_id = $6
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&input.country)
    .bind(&input.city)
    .bind(&input.street)
    .bind(&input.building)
    .bind(input.product_id)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM shipping_addresses WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
