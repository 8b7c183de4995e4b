//! Route ordering and list/map synchronization for a delivery address list.
//!
//! The computations here are synchronous and pure: callers pass the current
//! position and the stored entries in, and get plain data back. Storage,
//! geocoding and rendering are collaborators living in other crates.

pub mod app_config;
pub mod config;
pub mod error;
pub mod geo;
pub mod map_sync;
pub mod optimizer;
pub mod presenter;
pub mod session;
pub mod storage;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError, StoreError};
pub use geo::{haversine_km, EARTH_RADIUS_KM};
pub use map_sync::{sync_points, sync_route, Bounds, MapAction, MapPoint, MapSync, DEFAULT_VIEW};
pub use optimizer::optimize_route;
pub use presenter::{present, present_route, DisplayRow};
pub use session::{PositionThrottle, PositionUpdate, Session, SessionState, Snapshot};
pub use storage::{AddressStore, MemoryStore};
pub use types::{AddressEntry, Coordinate, EntryId, Position};
