//! Address autocomplete against the Geoapify geocoding API.

use reqwest::{Client, Url};

use crate::debounce::Debouncer;
use crate::error::GeocodeError;
use crate::http::{build_client, get_json, parse_base_url, ClientOptions};
use crate::retry::retry_with_backoff;
use crate::types::GeoapifyResponse;

const DEFAULT_BASE_URL: &str = "https://api.geoapify.com/";
const SERVICE: &str = "geoapify";

pub struct GeoapifyClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    limit: usize,
    lang: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl GeoapifyClient {
    /// Creates a client pointed at the public Geoapify API.
    ///
    /// Without an API key the client still builds, but every
    /// [`suggest`](Self::suggest) fails with [`GeocodeError::MissingApiKey`].
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        options: &ClientOptions,
        api_key: Option<String>,
        limit: usize,
        lang: &str,
    ) -> Result<Self, GeocodeError> {
        Self::with_base_url(options, DEFAULT_BASE_URL, api_key, limit, lang)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        options: &ClientOptions,
        base_url: &str,
        api_key: Option<String>,
        limit: usize,
        lang: &str,
    ) -> Result<Self, GeocodeError> {
        Ok(Self {
            client: build_client(options)?,
            base_url: parse_base_url(base_url)?,
            api_key,
            limit: limit.max(1),
            lang: lang.to_owned(),
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
        })
    }

    /// Returns formatted address suggestions for partial input `text`.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::MissingApiKey`] when no key is configured.
    /// - [`GeocodeError::Http`] / [`GeocodeError::RateLimited`] after retries are exhausted.
    /// - [`GeocodeError::Deserialize`] if the body is not a feature collection.
    pub async fn suggest(&self, text: &str) -> Result<Vec<String>, GeocodeError> {
        let api_key = self.api_key.as_deref().ok_or(GeocodeError::MissingApiKey)?;
        let limit = self.limit.to_string();
        let url = self.build_url(&[
            ("text", text.trim()),
            ("limit", limit.as_str()),
            ("lang", self.lang.as_str()),
            ("apiKey", api_key),
        ]);

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            get_json(&self.client, &url, SERVICE)
        })
        .await?;

        let response: GeoapifyResponse =
            serde_json::from_value(body).map_err(|e| GeocodeError::Deserialize {
                context: format!("autocomplete(text={text})"),
                source: e,
            })?;

        Ok(response
            .features
            .into_iter()
            .filter_map(|f| f.properties.formatted)
            .filter(|s| !s.trim().is_empty())
            .collect())
    }

    fn build_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v1", "geocode", "autocomplete"]);
        }
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }
}

/// Debounced autocomplete for one input field.
///
/// Input shorter than `min_chars` cancels any pending lookup and yields an
/// empty list straight away. Otherwise returns `None` if a newer keystroke
/// superseded this one, or the suggestions (empty on failure) if not.
pub async fn suggest_debounced(
    client: &GeoapifyClient,
    debouncer: &Debouncer,
    text: &str,
    min_chars: usize,
) -> Option<Vec<String>> {
    let text = text.trim();
    if text.chars().count() < min_chars {
        debouncer.cancel();
        return Some(Vec::new());
    }

    let result = debouncer.run(|| client.suggest(text)).await?;
    match result {
        Ok(suggestions) => Some(suggestions),
        Err(e) => {
            tracing::warn!(text, error = %e, "autocomplete failed");
            Some(Vec::new())
        }
    }
}
