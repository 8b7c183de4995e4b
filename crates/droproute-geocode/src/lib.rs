//! HTTP collaborators for turning text into coordinates and back.
//!
//! - [`NominatimClient`]: forward and reverse geocoding against `OpenStreetMap` Nominatim.
//! - [`GeoapifyClient`]: address autocomplete, usually driven through a [`Debouncer`].

pub mod autocomplete;
pub mod client;
pub mod debounce;
pub mod error;
mod http;
mod retry;
pub mod types;

pub use autocomplete::{suggest_debounced, GeoapifyClient};
pub use client::{NominatimClient, UNKNOWN_LOCATION};
pub use debounce::Debouncer;
pub use error::GeocodeError;
pub use http::ClientOptions;
