use uuid::Uuid;

use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::role::SUPERUSER;
use crate::models::{User, UserInput, UserSummary};
use crate::services::not_found;
use crate::state::SharedState;
use crate::validation;

const DUPLICATE_EMAIL: &str = "A user with this email already exists";

/// Create (`id = None`) or update a user and replace its roles, in one
/// transaction. Unknown role names roll the whole write back.
pub async fn save(
    state: &SharedState,
    id: Option<Uuid>,
    input: UserInput,
) -> Result<UserSummary, AppError> {
    let input = input.validated(id.is_none())?;
    let password_hash = input.password.as_deref().map(password::hash).transpose()?;

    let mut tx = state.pool.begin().await?;

    let written = match id {
        None => {
            let hash = password_hash
                .as_deref()
                .ok_or_else(|| AppError::BadRequest("Password is required".to_string()))?;
            db::users::create(&mut *tx, &input.email, hash, input.active, input.confirmed_at).await
        }
        Some(id) => {
            db::users::update(
                &mut *tx,
                id,
                &input.email,
                password_hash.as_deref(),
                input.active,
                input.confirmed_at,
            )
            .await
        }
    };
    let user = written.map_err(|e| AppError::from_constraint(e, DUPLICATE_EMAIL, DUPLICATE_EMAIL))?;

    let linked = db::users::set_roles(&mut tx, user.id, &input.roles).await?;
    if linked as usize != input.roles.len() {
        return Err(AppError::BadRequest("Unknown role selected".to_string()));
    }

    tx.commit().await?;

    match id {
        None => tracing::info!(user_id = %user.id, email = %user.email, "User created"),
        Some(_) => tracing::info!(user_id = %user.id, "User updated"),
    }

    db::users::find_summary(&state.pool, user.id)
        .await?
        .ok_or_else(|| not_found("User"))
}

/// Blocked while the user still owns products. Nobody can delete their own
/// account.
pub async fn remove(state: &SharedState, actor: Uuid, id: Uuid) -> Result<(), AppError> {
    if actor == id {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }
    let deleted = db::users::delete(&state.pool, id).await.map_err(|e| {
        AppError::from_constraint(
            e,
            "User cannot be deleted",
            "User still owns products; delete or reassign them first",
        )
    })?;
    if deleted == 0 {
        return Err(not_found("User"));
    }
    tracing::info!(user_id = %id, "User deleted");
    Ok(())
}

/// First-run registration: only allowed while there are no users at all.
/// The new account is active, confirmed and holds the superuser role.
pub async fn bootstrap(state: &SharedState, email: &str, password_raw: &str) -> Result<User, AppError> {
    let email = validation::email(email)?;
    let pw = validation::password(password_raw)?;
    let pw_hash = password::hash(&pw)?;

    // Advisory lock prevents concurrent bootstrap registrations
    let mut tx = state.pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock(1)")
        .execute(&mut *tx)
        .await?;

    if db::users::count_all(&mut *tx).await? > 0 {
        return Err(AppError::Forbidden(
            "Registration is disabled. Ask an administrator for an account.".to_string(),
        ));
    }

    let user = db::users::create(&mut *tx, &email, &pw_hash, true, Some(chrono::Utc::now()))
        .await
        .map_err(|e| AppError::from_constraint(e, DUPLICATE_EMAIL, DUPLICATE_EMAIL))?;

    let roles = [SUPERUSER.to_string()];
    if db::users::set_roles(&mut tx, user.id, &roles).await? != 1 {
        return Err(AppError::Internal(format!(
            "The {SUPERUSER} role is missing; run the migrations"
        )));
    }

    tx.commit().await?;
    tracing::info!(user_id = %user.id, email = %user.email, "Bootstrap superuser registered");
    Ok(user)
}
