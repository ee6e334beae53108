use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::AppError;

/// Argon2id, 19 MiB memory, 2 passes, 1 lane.
fn hasher() -> Result<Argon2<'static>, AppError> {
    let params = Params::new(19 * 1024, 2, 1, None)
        .map_err(|e| AppError::Internal(format!("Invalid Argon2 params: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// A stored value that is not a PHC hash never matches.
pub fn verify(password: &str, stored: &str) -> Result<bool, AppError> {
    let Ok(parsed) = PasswordHash::new(stored) else {
        tracing::warn!("Stored password is not a valid PHC string");
        return Ok(false);
    };
    Ok(hasher()?
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
