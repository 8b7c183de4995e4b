//! Ordered list view of the stored entries.

use serde::Serialize;

use crate::geo::haversine_km;
use crate::optimizer::optimize_route;
use crate::types::{AddressEntry, EntryId, Position};

/// One line of the rendered address list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    /// Targets exactly one stored entry for removal.
    pub id: EntryId,
    /// 1-based position in the route; `None` for unresolved entries or when
    /// no position is known.
    pub rank: Option<usize>,
    pub label: String,
    /// Straight-line distance from the current position.
    pub distance_km: Option<f64>,
    pub has_coords: bool,
}

impl std::fmt::Display for DisplayRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.rank {
            Some(rank) => write!(f, "{rank:>3}. ")?,
            None => f.write_str("   - ")?,
        }
        f.write_str(&self.label)?;
        if let Some(km) = self.distance_km {
            write!(f, " ({km:.2} km)")?;
        }
        Ok(())
    }
}

/// Builds the list view, running the optimizer itself.
#[must_use]
pub fn present(position: Option<Position>, entries: &[AddressEntry]) -> Vec<DisplayRow> {
    let route = optimize_route(position, entries);
    present_route(position, &route, entries)
}

/// Builds the list view from an already computed route.
///
/// With a position, ranked rows follow `route` order and are followed by the
/// unresolved entries in stored order. Without one, every entry is listed in
/// stored order with no rank and no distance.
#[must_use]
pub fn present_route(
    position: Option<Position>,
    route: &[&AddressEntry],
    entries: &[AddressEntry],
) -> Vec<DisplayRow> {
    let Some(position) = position else {
        return entries
            .iter()
            .map(|entry| DisplayRow {
                id: entry.id,
                rank: None,
                label: entry.label.clone(),
                distance_km: None,
                has_coords: entry.has_coords(),
            })
            .collect();
    };

    let ranked = route.iter().enumerate().filter_map(|(idx, entry)| {
        entry.coordinate().map(|coord| DisplayRow {
            id: entry.id,
            rank: Some(idx + 1),
            label: entry.label.clone(),
            distance_km: Some(haversine_km(position, coord)),
            has_coords: true,
        })
    });

    let unresolved = entries
        .iter()
        .filter(|entry| !entry.has_coords())
        .map(|entry| DisplayRow {
            id: entry.id,
            rank: None,
            label: entry.label.clone(),
            distance_km: None,
            has_coords: false,
        });

    ranked.chain(unresolved).collect()
}
