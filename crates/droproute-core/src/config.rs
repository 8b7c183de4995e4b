use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so an empty environment is valid.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(raw)
    };

    let positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value: usize = parse_num(var, &or_default(var, default))?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("DROPROUTE_ENV", "development"))?;
    let log_level = or_default("DROPROUTE_LOG_LEVEL", env.default_log_level());
    let store_path = PathBuf::from(parse("DROPROUTE_STORE_PATH", env.default_store_path())?);

    let nominatim_url = parse(
        "DROPROUTE_NOMINATIM_URL",
        "https://nominatim.openstreetmap.org/",
    )?;
    let geoapify_url = parse("DROPROUTE_GEOAPIFY_URL", "https://api.geoapify.com/")?;
    let geoapify_api_key = lookup("GEOAPIFY_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let user_agent = parse(
        "DROPROUTE_USER_AGENT",
        "droproute/0.1 (delivery-route-helper)",
    )?;

    let request_timeout_secs: u64 = parse_num(
        "DROPROUTE_REQUEST_TIMEOUT_SECS",
        &or_default("DROPROUTE_REQUEST_TIMEOUT_SECS", "15"),
    )?;
    let max_retries: u32 = parse_num(
        "DROPROUTE_MAX_RETRIES",
        &or_default("DROPROUTE_MAX_RETRIES", "2"),
    )?;
    let retry_backoff_base_ms: u64 = parse_num(
        "DROPROUTE_RETRY_BACKOFF_BASE_MS",
        &or_default("DROPROUTE_RETRY_BACKOFF_BASE_MS", "500"),
    )?;

    let autocomplete_debounce_ms: u64 = parse_num(
        "DROPROUTE_AUTOCOMPLETE_DEBOUNCE_MS",
        &or_default("DROPROUTE_AUTOCOMPLETE_DEBOUNCE_MS", "300"),
    )?;
    let autocomplete_min_chars = positive_usize("DROPROUTE_AUTOCOMPLETE_MIN_CHARS", "3")?;
    let autocomplete_limit = positive_usize("DROPROUTE_AUTOCOMPLETE_LIMIT", "5")?;
    let autocomplete_lang = parse("DROPROUTE_AUTOCOMPLETE_LANG", "pt")?;

    let min_move_meters: f64 = parse_num(
        "DROPROUTE_MIN_MOVE_METERS",
        &or_default("DROPROUTE_MIN_MOVE_METERS", "25"),
    )?;
    if !min_move_meters.is_finite() || min_move_meters < 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "DROPROUTE_MIN_MOVE_METERS".to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }
    let max_refresh_secs: u64 = parse_num(
        "DROPROUTE_MAX_REFRESH_SECS",
        &or_default("DROPROUTE_MAX_REFRESH_SECS", "30"),
    )?;

    Ok(AppConfig {
        env,
        log_level,
        store_path,
        nominatim_url,
        geoapify_url,
        geoapify_api_key,
        user_agent,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        autocomplete_debounce_ms,
        autocomplete_min_chars,
        autocomplete_limit,
        autocomplete_lang,
        min_move_meters,
        max_refresh_secs,
    })
}

fn parse_num<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DROPROUTE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
