//! Data model shared by the optimizer, presenter, map synchronizer and session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// The device's current location. Replaced wholesale on every update.
pub type Position = Coordinate;

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` when both components are finite and inside ±90 / ±180.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// Stable identity of a stored entry, independent of its label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A stored delivery address with optionally resolved coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressEntry {
    #[serde(default)]
    pub id: EntryId,
    /// Address text as typed or picked from autocomplete.
    pub label: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl AddressEntry {
    /// Builds a new entry with a fresh id.
    ///
    /// Coordinates outside the valid range are dropped so the entry is stored
    /// as unresolved rather than poisoning the route.
    #[must_use]
    pub fn new(label: impl Into<String>, coords: Option<Coordinate>) -> Self {
        let coords = coords.filter(Coordinate::is_valid);
        Self {
            id: EntryId::new(),
            label: label.into(),
            lat: coords.map(|c| c.lat),
            lon: coords.map(|c| c.lon),
            added_at: Utc::now(),
        }
    }

    /// The entry's coordinates, present only when both components are set
    /// and form a valid coordinate. Stored data is not trusted.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate { lat, lon }).filter(Coordinate::is_valid),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_coords(&self) -> bool {
        self.coordinate().is_some()
    }
}
