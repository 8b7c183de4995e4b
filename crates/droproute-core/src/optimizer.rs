//! Greedy nearest-neighbor route ordering.
//!
//! Starting from the current position, repeatedly travels to the closest
//! unvisited entry. O(n²) in the number of resolved entries, which is fine for
//! a hand-maintained delivery list. This is a heuristic; the result is not
//! guaranteed to be the shortest tour.

use crate::geo::haversine_km;
use crate::types::{AddressEntry, Coordinate, Position};

/// Orders the coordinate-bearing entries into a nearest-neighbor route.
///
/// Returns borrowed entries in visiting order. Entries without both
/// coordinates never appear. When `position` is `None` or nothing is
/// resolved, the route is empty.
///
/// Ties go to the candidate that comes first in `entries`: the scan keeps the
/// first strict minimum.
#[must_use]
pub fn optimize_route(position: Option<Position>, entries: &[AddressEntry]) -> Vec<&AddressEntry> {
    let Some(start) = position else {
        return Vec::new();
    };

    let mut candidates: Vec<(&AddressEntry, Coordinate)> = entries
        .iter()
        .filter_map(|entry| entry.coordinate().map(|coord| (entry, coord)))
        .collect();

    let mut route = Vec::with_capacity(candidates.len());
    let mut cursor = start;

    while !candidates.is_empty() {
        let mut best_idx = 0;
        let mut best_dist = haversine_km(cursor, candidates[0].1);
        for (idx, (_, coord)) in candidates.iter().enumerate().skip(1) {
            let dist = haversine_km(cursor, *coord);
            if dist < best_dist {
                best_idx = idx;
                best_dist = dist;
            }
        }

        // `remove` keeps the remaining candidates in list order for the next tie-break.
        let (entry, coord) = candidates.remove(best_idx);
        route.push(entry);
        cursor = coord;
    }

    tracing::debug!(stops = route.len(), "route optimized");
    route
}
