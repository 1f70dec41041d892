use crate::app_config::{AppConfig, Environment};
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
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let backend_url = require("CHISPA_BACKEND_URL")?;
    if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "CHISPA_BACKEND_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{backend_url}'"),
        });
    }
    let backend_anon_key = require("CHISPA_BACKEND_ANON_KEY")?;

    let env = parse_environment(&or_default("CHISPA_ENV", "development"))?;
    let bind_addr = parse_addr("CHISPA_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CHISPA_LOG_LEVEL", "info");

    let backend_timeout_secs = parse_u64("CHISPA_BACKEND_TIMEOUT_SECS", "30")?;
    let backend_user_agent = or_default("CHISPA_BACKEND_USER_AGENT", "chispa/0.1 (field-visits)");

    let session_ttl_secs = parse_u64("CHISPA_SESSION_TTL_SECS", "28800")?;
    if session_ttl_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CHISPA_SESSION_TTL_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        backend_url,
        backend_anon_key,
        env,
        bind_addr,
        log_level,
        backend_timeout_secs,
        backend_user_agent,
        session_ttl_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CHISPA_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
