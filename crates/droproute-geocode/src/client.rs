//! Forward and reverse geocoding against `OpenStreetMap` Nominatim.

use droproute_core::Coordinate;
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::http::{build_client, get_json, parse_base_url, ClientOptions};
use crate::retry::retry_with_backoff;
use crate::types::{NominatimPlace, NominatimReverse};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";
const SERVICE: &str = "nominatim";

/// Place name shown when reverse geocoding fails.
pub const UNKNOWN_LOCATION: &str = "unknown location";

/// Client for the Nominatim `search` and `reverse` endpoints.
///
/// Use [`NominatimClient::new`] for the public instance or
/// [`NominatimClient::with_base_url`] for a self-hosted one or a mock server.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NominatimClient {
    /// Creates a client pointed at the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(options: &ClientOptions) -> Result<Self, GeocodeError> {
        Self::with_base_url(options, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(options: &ClientOptions, base_url: &str) -> Result<Self, GeocodeError> {
        Ok(Self {
            client: build_client(options)?,
            base_url: parse_base_url(base_url)?,
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
        })
    }

    /// Resolves free-text `address` to coordinates using the best match.
    ///
    /// Returns `Ok(None)` when Nominatim finds nothing.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] / [`GeocodeError::RateLimited`] after retries are exhausted.
    /// - [`GeocodeError::Deserialize`] if the body is not a result array.
    /// - [`GeocodeError::InvalidResponse`] if the coordinates are not numbers in range.
    pub async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let url = self.build_url(
            "search",
            &[("format", "json"), ("limit", "1"), ("q", address.trim())],
        );
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            get_json(&self.client, &url, SERVICE)
        })
        .await?;

        let places: Vec<NominatimPlace> =
            serde_json::from_value(body).map_err(|e| GeocodeError::Deserialize {
                context: format!("search(q={address})"),
                source: e,
            })?;

        let Some(place) = places.into_iter().next() else {
            tracing::debug!(address, "geocoder returned no match");
            return Ok(None);
        };

        let coord = parse_coordinate(&place.lat, &place.lon).ok_or_else(|| {
            GeocodeError::InvalidResponse {
                context: format!("search(q={address})"),
                reason: format!("unusable coordinates lat={} lon={}", place.lat, place.lon),
            }
        })?;
        tracing::debug!(
            address,
            %coord,
            display_name = place.display_name.as_deref().unwrap_or_default(),
            "address geocoded"
        );
        Ok(Some(coord))
    }

    /// Looks up a human-readable place name for `coord`.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::NotFound`] if Nominatim has no place there.
    /// - [`GeocodeError::Http`] / [`GeocodeError::RateLimited`] after retries are exhausted.
    /// - [`GeocodeError::Deserialize`] if the body has an unexpected shape.
    pub async fn reverse_geocode(&self, coord: Coordinate) -> Result<String, GeocodeError> {
        let lat = coord.lat.to_string();
        let lon = coord.lon.to_string();
        let url = self.build_url(
            "reverse",
            &[
                ("format", "json"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
            ],
        );
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            get_json(&self.client, &url, SERVICE)
        })
        .await?;

        let reverse: NominatimReverse =
            serde_json::from_value(body).map_err(|e| GeocodeError::Deserialize {
                context: format!("reverse({coord})"),
                source: e,
            })?;

        match (reverse.display_name, reverse.error) {
            (Some(name), _) if !name.trim().is_empty() => Ok(name),
            (_, error) => {
                tracing::debug!(%coord, error = error.as_deref().unwrap_or_default(), "no reverse match");
                Err(GeocodeError::NotFound {
                    query: coord.to_string(),
                })
            }
        }
    }

    /// [`geocode`](Self::geocode) that logs failures and treats them as "no coordinates".
    pub async fn geocode_or_none(&self, address: &str) -> Option<Coordinate> {
        match self.geocode(address).await {
            Ok(coord) => coord,
            Err(e) => {
                tracing::warn!(address, error = %e, "geocoding failed, storing address without coordinates");
                None
            }
        }
    }

    /// [`reverse_geocode`](Self::reverse_geocode) that falls back to [`UNKNOWN_LOCATION`].
    pub async fn place_name_or_unknown(&self, coord: Coordinate) -> String {
        match self.reverse_geocode(coord).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(%coord, error = %e, "reverse geocoding failed");
                UNKNOWN_LOCATION.to_owned()
            }
        }
    }

    /// Builds `{base}{endpoint}?k=v…` with percent-encoded parameters.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(endpoint);
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

fn parse_coordinate(lat: &str, lon: &str) -> Option<Coordinate> {
    let coord = Coordinate::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?);
    coord.is_valid().then_some(coord)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
