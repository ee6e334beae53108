use sqlx::PgPool;
use uuid::Uuid;

use crate::db::ListParams;
use crate::models::Role;

const SORTABLE: &[(&str, &str)] = &[("name", "name"), ("description", "description")];

pub async fn list(pool: &PgPool, params: &ListParams) -> Result<Vec<Role>, sqlx::Error> {
    let order = params.order_by(SORTABLE, "name", "id");
    sqlx::query_as::<_, Role>(&format!(
        "SELECT * FROM roles ORDER BY {order} LIMIT $1 OFFSET $2"
    ))
    .bind(params.limit)
    .bind(params.offset)
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM roles")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
) -> Result<Role, sqlx::Error> {
    sqlx::query_as::<_, Role>(
        "INSERT INTO roles (name, description) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<Role, sqlx::Error> {
    sqlx::query_as::<_, Role>(
        "UPDATE roles SET name = $2, description = $3 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

/// Membership rows go with the role.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
