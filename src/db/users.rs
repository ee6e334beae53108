use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::ListParams;
use crate::models::{User, UserSummary};

const SUMMARY_SELECT: &str = "SELECT u.id, u.email, u.active, u.confirmed_at,
        ARRAY(
            SELECT r.name::text FROM roles r
            JOIN roles_users ru ON ru.role_id = r.id
            WHERE ru.user_id = u.id ORDER BY r.name
        ) AS roles,
        (SELECT COUNT(*) FROM products p WHERE p.user_id = u.id) AS product_count
     FROM users u";

const SORTABLE: &[(&str, &str)] = &[
    ("email", "u.email"),
    ("active", "u.active"),
    ("confirmed_at", "u.confirmed_at"),
];

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    email: &str,
    password_hash: &str,
    active: bool,
    confirmed_at: Option<DateTime<Utc>>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash, active, confirmed_at)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(email)
    .bind(password_hash)
    .bind(active)
    .bind(confirmed_at)
    .fetch_one(executor)
    .await
}

/// `password_hash = None` keeps the stored hash.
pub async fn update<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    email: &str,
    password_hash: Option<&str>,
    active: bool,
    confirmed_at: Option<DateTime<Utc>>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET email = $2, password_hash = COALESCE($3, password_hash),
             active = $4, confirmed_at = $5
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .bind(active)
    .bind(confirmed_at)
    .fetch_one(executor)
    .await
}

/// Replace the user's roles with the named ones. Returns how many links were
/// written, so callers can detect unknown names.
pub async fn set_roles(
    conn: &mut sqlx::PgConnection,
    user_id: Uuid,
    role_names: &[String],
) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM roles_users WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    let result = sqlx::query(
        "INSERT INTO roles_users (user_id, role_id)
         SELECT $1, id FROM roles WHERE name = ANY($2)",
    )
    .bind(user_id)
    .bind(role_names)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_summary(pool: &PgPool, id: Uuid) -> Result<Option<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(&format!("{SUMMARY_SELECT} WHERE u.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list(pool: &PgPool, params: &ListParams) -> Result<Vec<UserSummary>, sqlx::Error> {
    let order = params.order_by(SORTABLE, "u.email", "u.id");
    sqlx::query_as::<_, UserSummary>(&format!(
        "{SUMMARY_SELECT} ORDER BY {order} LIMIT $1 OFFSET $2"
    ))
    .bind(params.limit)
    .bind(params.offset)
    .fetch_all(pool)
    .await
}

/// Every user, for owner pickers.
pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY email")
        .fetch_all(pool)
        .await
}

pub async fn count_all<'e, E: sqlx::PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

pub async fn has_role(pool: &PgPool, user_id: Uuid, role: &str) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS (
             SELECT 1 FROM roles_users ru JOIN roles r ON r.id = ru.role_id
             WHERE ru.user_id = $1 AND r.name = $2
         )",
    )
    .bind(user_id)
    .bind(role)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// Fails with a foreign-key violation while the user still owns products.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
