use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub session_hours: i64,
    pub secure_cookies: bool,
    pub page_size: i64,
    pub max_body_size: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("ECOMMERCE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid ECOMMERCE_HOST: {e}"))?;

        let port: u16 = env_or("ECOMMERCE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid ECOMMERCE_PORT: {e}"))?;

        let session_hours = parse_session_hours(&env_or("ECOMMERCE_SESSION_HOURS", "12"))?;

        let secure_cookies = parse_bool(&env_or("ECOMMERCE_SECURE_COOKIES", "true"))
            .ok_or_else(|| "Invalid ECOMMERCE_SECURE_COOKIES: expected true or false".to_string())?;

        let page_size: i64 = env_or("ECOMMERCE_PAGE_SIZE", "20")
            .parse()
            .map_err(|e| format!("Invalid ECOMMERCE_PAGE_SIZE: {e}"))?;
        if !(1..=500).contains(&page_size) {
            return Err("ECOMMERCE_PAGE_SIZE must be between 1 and 500".to_string());
        }

        let max_body_size: usize = env_or("ECOMMERCE_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid ECOMMERCE_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("ECOMMERCE_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            session_hours,
            secure_cookies,
            page_size,
            max_body_size,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Longest session a token may be issued for: one year.
const MAX_SESSION_HOURS: i64 = 24 * 366;

fn parse_session_hours(value: &str) -> Result<i64, String> {
    let hours: i64 = value
        .trim()
        .parse()
        .map_err(|e| format!("Invalid ECOMMERCE_SESSION_HOURS: {e}"))?;
    if !(1..=MAX_SESSION_HOURS).contains(&hours) {
        return Err(format!(
            "ECOMMERCE_SESSION_HOURS must be between 1 and {MAX_SESSION_HOURS}"
        ));
    }
    Ok(hours)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
