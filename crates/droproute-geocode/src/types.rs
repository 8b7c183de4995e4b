//! Wire types for the Nominatim and Geoapify JSON APIs.

use serde::Deserialize;

/// One hit from Nominatim `search`. Coordinates arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Nominatim `reverse` body. Misses come back as `{"error": "..."}` with 200.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimReverse {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoapifyResponse {
    #[serde(default)]
    pub features: Vec<GeoapifyFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoapifyFeature {
    pub properties: GeoapifyProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoapifyProperties {
    #[serde(default)]
    pub formatted: Option<String>,
}
