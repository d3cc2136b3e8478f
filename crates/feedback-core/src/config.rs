use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::{Ipv4Addr, SocketAddr};
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .parse::<u16>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;

    let port = parse_u16("PORT", "3000")?;
    let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let log_level = or_default("FEEDBACK_LOG_LEVEL", "info");
    let public_dir = PathBuf::from(or_default("FEEDBACK_PUBLIC_DIR", "./public"));
    let assets_dir = PathBuf::from(or_default("FEEDBACK_ASSETS_DIR", "./assets"));

    let db_max_connections = parse_u32("FEEDBACK_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("FEEDBACK_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("FEEDBACK_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if db_min_connections > db_max_connections {
        return Err(invalid(
            "FEEDBACK_DB_MIN_CONNECTIONS",
            format!("must not exceed FEEDBACK_DB_MAX_CONNECTIONS ({db_max_connections})"),
        ));
    }

    Ok(AppConfig {
        database_url,
        bind_addr,
        log_level,
        public_dir,
        assets_dir,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}
