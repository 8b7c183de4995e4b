//! Desired map draw state for a route.
//!
//! Decides which points to draw and in what order. How a map widget draws
//! them is the rendering collaborator's business.

use serde::Serialize;

use crate::geo::haversine_km;
use crate::optimizer::optimize_route;
use crate::types::{AddressEntry, Coordinate, EntryId, Position};

/// Initial view before anything is known: center of Brazil, zoom 4.
pub const DEFAULT_VIEW: (Coordinate, u8) = (Coordinate { lat: -14.0, lon: -51.0 }, 4);

/// Zoom used when there is a single point to show.
pub const SINGLE_POINT_ZOOM: u8 = 13;

/// Padding around the route when fitting the viewport.
pub const FIT_PADDING_PX: u32 = 30;

/// A labelled route stop marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub id: EntryId,
    pub coordinate: Coordinate,
    pub label: String,
    /// 1-based route position.
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSync {
    /// The moving "you are here" marker.
    pub self_point: Option<Coordinate>,
    pub route_points: Vec<MapPoint>,
}

/// Axis-aligned bounding box of a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    fn around(first: Coordinate, rest: &[Coordinate]) -> Self {
        let init = Self {
            south_west: first,
            north_east: first,
        };
        rest.iter().fold(init, |b, p| Self {
            south_west: Coordinate::new(b.south_west.lat.min(p.lat), b.south_west.lon.min(p.lon)),
            north_east: Coordinate::new(b.north_east.lat.max(p.lat), b.north_east.lon.max(p.lon)),
        })
    }
}

/// What the map widget should do with the current draw state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MapAction {
    /// Draw a polyline through `points` and fit the viewport to `bounds`.
    DrawPath {
        points: Vec<Coordinate>,
        bounds: Bounds,
        padding_px: u32,
    },
    /// Only one point exists: recenter on it.
    CenterOn { point: Coordinate, zoom: u8 },
    None,
}

impl MapSync {
    /// The polyline: self point first, then the stops in route order.
    #[must_use]
    pub fn path(&self) -> Vec<Coordinate> {
        self.self_point
            .into_iter()
            .chain(self.route_points.iter().map(|p| p.coordinate))
            .collect()
    }

    /// Straight-line length of [`path`](Self::path) in kilometers.
    #[must_use]
    pub fn path_length_km(&self) -> f64 {
        self.path()
            .windows(2)
            .map(|leg| haversine_km(leg[0], leg[1]))
            .sum()
    }

    /// Path when two or more points exist, recenter for exactly one, nothing
    /// otherwise.
    #[must_use]
    pub fn action(&self) -> MapAction {
        let points = self.path();
        let Some((&first, rest)) = points.split_first() else {
            return MapAction::None;
        };
        if rest.is_empty() {
            return MapAction::CenterOn {
                point: first,
                zoom: SINGLE_POINT_ZOOM,
            };
        }
        let bounds = Bounds::around(first, rest);
        MapAction::DrawPath {
            points,
            bounds,
            padding_px: FIT_PADDING_PX,
        }
    }
}

/// Builds the draw state, running the optimizer itself.
#[must_use]
pub fn sync_points(position: Option<Position>, entries: &[AddressEntry]) -> MapSync {
    let route = optimize_route(position, entries);
    sync_route(position, &route)
}

/// Builds the draw state from an already computed route.
#[must_use]
pub fn sync_route(position: Option<Position>, route: &[&AddressEntry]) -> MapSync {
    let route_points = route
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            entry.coordinate().map(|coordinate| MapPoint {
                id: entry.id,
                coordinate,
                label: entry.label.clone(),
                rank: idx + 1,
            })
        })
        .collect();

    MapSync {
        self_point: position,
        route_points,
    }
}
