use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::{Role, RoleInput};
use crate::services::not_found;
use crate::state::SharedState;

/// Create (`id = None`) or update a role.
pub async fn save(state: &SharedState, id: Option<Uuid>, input: RoleInput) -> Result<Role, AppError> {
    let input = input.validated()?;
    let result = match id {
        None => db::roles::create(&state.pool, &input.name, input.description.as_deref()).await,
        Some(id) => {
            db::roles::update(&state.pool, id, &input.name, input.description.as_deref()).await
        }
    };
    let role = result.map_err(|e| {
        AppError::from_constraint(e, "A role with this name already exists", "Role is still referenced")
    })?;

    match id {
        None => tracing::info!(role_id = %role.id, name = %role.name, "Role created"),
        Some(_) => tracing::info!(role_id = %role.id, "Role updated"),
    }
    Ok(role)
}

/// Users holding the role simply lose it.
pub async fn remove(state: &SharedState, id: Uuid) -> Result<(), AppError> {
    let deleted = db::roles::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(not_found("Role"));
    }
    tracing::info!(role_id = %id, "Role deleted");
    Ok(())
}
