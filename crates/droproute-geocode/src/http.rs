//! Shared HTTP plumbing for the geocoding clients.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::GeocodeError;

/// Transport settings shared by every client in this crate.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout_secs: u64,
    /// Nominatim's usage policy requires an identifying `User-Agent`.
    pub user_agent: String,
    /// Additional attempts after the first failure on transient errors.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: "droproute/0.1 (delivery-route-helper)".to_owned(),
            max_retries: 2,
            backoff_base_ms: 500,
        }
    }
}

pub(crate) fn build_client(options: &ClientOptions) -> Result<Client, GeocodeError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(options.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(options.user_agent.clone())
        .build()?)
}

/// Parses `base_url`, forcing exactly one trailing slash so `Url::join`
/// appends to the path instead of replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, GeocodeError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

/// Sends a GET request and parses the body as JSON. HTTP 429 maps to
/// [`GeocodeError::RateLimited`]; other non-2xx statuses to [`GeocodeError::Http`].
pub(crate) async fn get_json(
    client: &Client,
    url: &Url,
    service: &'static str,
) -> Result<serde_json::Value, GeocodeError> {
    let response = client.get(url.clone()).send().await?;
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited { service });
    }
    let response = response.error_for_status()?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
        context: format!("{service} {}", url.path()),
        source: e,
    })
}
