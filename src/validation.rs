//! Field checks derived from the column definitions.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Trimmed, non-empty, at most `max` characters.
pub fn required(label: &str, value: &str, max: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{label} is required")));
    }
    check_length(label, value, max)?;
    Ok(value.to_string())
}

/// Like [`required`], but blank input becomes `None`.
pub fn optional(label: &str, value: Option<&str>, max: usize) -> Result<Option<String>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            check_length(label, v, max)?;
            Ok(Some(v.to_string()))
        }
    }
}

pub fn email(value: &str) -> Result<String, AppError> {
    let value = required("Email", value, 255)?.to_lowercase();
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'));
    if !valid || value.chars().any(char::is_whitespace) {
        return Err(AppError::BadRequest("Email is not a valid address".to_string()));
    }
    Ok(value)
}

pub fn password(value: &str) -> Result<String, AppError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if value.len() > 255 {
        return Err(AppError::BadRequest(
            "Password must be at most 255 characters".to_string(),
        ));
    }
    Ok(value.to_string())
}

/// Parse the value of an `<input type="datetime-local">`, read as UTC.
pub fn datetime_local(label: &str, value: &str) -> Result<Option<DateTime<Utc>>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map(|naive| Some(naive.and_utc()))
        .map_err(|_| AppError::BadRequest(format!("{label} must look like 2024-01-31T09:30")))
}

fn check_length(label: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{label} must be at most {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_bounds() {
        assert_eq!(required("Name", "  Lamp ", 10).unwrap(), "Lamp");
        assert!(matches!(required("Name", "   ", 10), Err(AppError::BadRequest(_))));
        assert!(matches!(required("Name", "abcdef", 5), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn optional_maps_blank_to_none() {
        assert_eq!(optional("Description", Some("  "), 10).unwrap(), None);
        assert_eq!(optional("Description", None, 10).unwrap(), None);
        assert_eq!(
            optional("Description", Some(" admins "), 10).unwrap(),
            Some("admins".to_string())
        );
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(email(" Admin@Shop.Example ").unwrap(), "admin@shop.example");
        assert!(email("no-at-sign").is_err());
        assert!(email("@shop.example").is_err());
        assert!(email("a@b@c").is_err());
        assert!(email("a b@c").is_err());
    }

    #[test]
    fn password_has_a_minimum_length() {
        assert!(password("short").is_err());
        assert!(password("long enough").is_ok());
    }

    #[test]
    fn datetime_local_accepts_browser_formats() {
        let parsed = datetime_local("Confirmed at", "2024-05-01T10:30").unwrap().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T10:30:00+00:00");
        assert!(datetime_local("Confirmed at", "2024-05-01T10:30:15").unwrap().is_some());
        assert_eq!(datetime_local("Confirmed at", "").unwrap(), None);
        assert!(datetime_local("Confirmed at", "yesterday").is_err());
    }
}
