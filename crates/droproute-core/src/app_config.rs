use std::path::PathBuf;
use std::time::Duration;

use crate::session::PositionThrottle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Log filter used when `DROPROUTE_LOG_LEVEL` is unset.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Test => "warn",
            Environment::Development | Environment::Production => "info",
        }
    }

    /// Address list location used when `DROPROUTE_STORE_PATH` is unset.
    /// Test runs never touch the working list.
    #[must_use]
    pub fn default_store_path(&self) -> &'static str {
        match self {
            Environment::Test => "./data/addresses.test.json",
            Environment::Development | Environment::Production => "./data/addresses.json",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub store_path: PathBuf,
    pub nominatim_url: String,
    pub geoapify_url: String,
    pub geoapify_api_key: Option<String>,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub autocomplete_debounce_ms: u64,
    pub autocomplete_min_chars: usize,
    pub autocomplete_limit: usize,
    pub autocomplete_lang: String,
    pub min_move_meters: f64,
    pub max_refresh_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn position_throttle(&self) -> PositionThrottle {
        PositionThrottle::new(
            self.min_move_meters,
            Duration::from_secs(self.max_refresh_secs),
        )
    }

    #[must_use]
    pub fn autocomplete_debounce(&self) -> Duration {
        Duration::from_millis(self.autocomplete_debounce_ms)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("store_path", &self.store_path)
            .field("nominatim_url", &self.nominatim_url)
            .field("geoapify_url", &self.geoapify_url)
            .field(
                "geoapify_api_key",
                &self.geoapify_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("autocomplete_debounce_ms", &self.autocomplete_debounce_ms)
            .field("autocomplete_min_chars", &self.autocomplete_min_chars)
            .field("autocomplete_limit", &self.autocomplete_limit)
            .field("autocomplete_lang", &self.autocomplete_lang)
            .field("min_move_meters", &self.min_move_meters)
            .field("max_refresh_secs", &self.max_refresh_secs)
            .finish()
    }
}
