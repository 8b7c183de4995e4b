use thiserror::Error;

/// Errors returned by the geocoding and autocomplete clients.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure, or a non-2xx status other than 429.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {service}")]
    RateLimited { service: &'static str },

    /// The body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed JSON carrying values we cannot use.
    #[error("invalid response for {context}: {reason}")]
    InvalidResponse { context: String, reason: String },

    #[error("no place found for {query}")]
    NotFound { query: String },

    #[error("autocomplete API key is not configured")]
    MissingApiKey,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
