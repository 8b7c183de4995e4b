//! Session coordinator: owns the current position and the stored list, and
//! recomputes the list and map views whenever either changes.
//!
//! Lifecycle is one-way: the session starts in [`SessionState::NoPosition`]
//! and the first accepted position moves it to [`SessionState::HasPosition`].
//! Later positions replace the stored one; nothing ever clears it.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::CoreError;
use crate::geo::haversine_km;
use crate::map_sync::{sync_route, MapAction, MapSync};
use crate::optimizer::optimize_route;
use crate::presenter::{present_route, DisplayRow};
use crate::storage::AddressStore;
use crate::types::{AddressEntry, Coordinate, EntryId, Position};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    NoPosition,
    HasPosition(Position),
}

/// Drops recomputes for position updates that barely moved.
///
/// An update is skipped when it is within `min_move_meters` of the last
/// recomputed position *and* arrives before `max_refresh` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionThrottle {
    pub min_move_meters: f64,
    pub max_refresh: Duration,
}

impl PositionThrottle {
    #[must_use]
    pub fn new(min_move_meters: f64, max_refresh: Duration) -> Self {
        Self {
            min_move_meters,
            max_refresh,
        }
    }

    /// Recompute on every update.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0.0, Duration::ZERO)
    }

    fn should_skip(&self, last: Option<(Position, Instant)>, next: Position, now: Instant) -> bool {
        let Some((last_pos, last_at)) = last else {
            return false;
        };
        let moved_m = haversine_km(last_pos, next) * 1000.0;
        moved_m < self.min_move_meters && now.saturating_duration_since(last_at) < self.max_refresh
    }
}

impl Default for PositionThrottle {
    fn default() -> Self {
        Self::new(25.0, Duration::from_secs(30))
    }
}

/// One recompute's output. Rows and map points come from the same route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub position: Option<Position>,
    pub rows: Vec<DisplayRow>,
    pub map: MapSync,
}

impl Snapshot {
    #[must_use]
    pub fn map_action(&self) -> MapAction {
        self.map.action()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PositionUpdate {
    Recomputed(Snapshot),
    /// Position stored, recompute skipped by the throttle.
    Throttled,
    /// Coordinates were not a valid location; nothing changed.
    Rejected,
}

pub struct Session<S: AddressStore> {
    store: S,
    entries: Vec<AddressEntry>,
    state: SessionState,
    throttle: PositionThrottle,
    last_recompute: Option<(Position, Instant)>,
}

impl<S: AddressStore> Session<S> {
    /// Opens a session over `store`, loading the saved list.
    ///
    /// A list that cannot be loaded is replaced by an empty one.
    pub fn open(store: S, throttle: PositionThrottle) -> Self {
        let entries = match store.load() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "stored address list unreadable, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(entries = entries.len(), "session opened");
        Self {
            store,
            entries,
            state: SessionState::NoPosition,
            throttle,
            last_recompute: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self.state {
            SessionState::NoPosition => None,
            SessionState::HasPosition(p) => Some(p),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[AddressEntry] {
        &self.entries
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Recomputes both views from the current position and list.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let position = self.position();
        let route = optimize_route(position, &self.entries);
        Snapshot {
            position,
            rows: present_route(position, &route, &self.entries),
            map: sync_route(position, &route),
        }
    }

    pub fn set_position(&mut self, position: Position) -> PositionUpdate {
        self.set_position_at(position, Instant::now())
    }

    /// Like [`set_position`](Self::set_position) with an explicit clock reading.
    pub fn set_position_at(&mut self, position: Position, now: Instant) -> PositionUpdate {
        if !position.is_valid() {
            tracing::warn!(lat = position.lat, lon = position.lon, "ignoring invalid position");
            return PositionUpdate::Rejected;
        }

        if self.state == SessionState::NoPosition {
            tracing::info!(%position, "position acquired");
        }
        self.state = SessionState::HasPosition(position);

        if self.throttle.should_skip(self.last_recompute, position, now) {
            tracing::debug!(%position, "position update throttled");
            return PositionUpdate::Throttled;
        }

        self.last_recompute = Some((position, now));
        PositionUpdate::Recomputed(self.snapshot())
    }

    /// Records a location provider failure. A known position is kept.
    #[must_use]
    pub fn location_unavailable(&self, reason: &str) -> Snapshot {
        match self.state {
            SessionState::NoPosition => {
                tracing::warn!(reason, "location unavailable, showing unsorted list");
            }
            SessionState::HasPosition(_) => {
                tracing::warn!(reason, "location update failed, keeping last position");
            }
        }
        self.snapshot()
    }

    /// Appends a new entry, persists the list and recomputes.
    ///
    /// Coordinates come from the geocoding collaborator; `None` stores the
    /// entry unresolved.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyLabel`] when `label` is blank.
    pub fn add_entry(
        &mut self,
        label: &str,
        coords: Option<Coordinate>,
    ) -> Result<(EntryId, Snapshot), CoreError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(CoreError::EmptyLabel);
        }

        let entry = AddressEntry::new(label, coords);
        let id = entry.id;
        if !entry.has_coords() {
            tracing::info!(label, "entry added without coordinates");
        }
        self.entries.push(entry);
        self.persist();
        Ok((id, self.snapshot()))
    }

    /// Removes the entry with `id`. Returns `None` when no entry matches.
    pub fn remove_entry(&mut self, id: EntryId) -> Option<Snapshot> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        self.remove_at(idx)
    }

    /// Removes the first entry whose label equals `label`.
    pub fn remove_by_label(&mut self, label: &str) -> Option<Snapshot> {
        let idx = self.entries.iter().position(|e| e.label == label)?;
        self.remove_at(idx)
    }

    fn remove_at(&mut self, idx: usize) -> Option<Snapshot> {
        let removed = self.entries.remove(idx);
        tracing::info!(label = %removed.label, id = %removed.id, "entry removed");
        self.persist();
        Some(self.snapshot())
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.entries) {
            tracing::warn!(error = %e, "failed to persist address list");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::map_sync::MapAction;
    use crate::storage::MemoryStore;

    struct BrokenStore;

    impl AddressStore for BrokenStore {
        fn load(&self) -> Result<Vec<AddressEntry>, StoreError> {
            Err(StoreError::Corrupt {
                path: "addresses.json".into(),
                reason: "expected value at line 1 column 1".to_owned(),
            })
        }

        fn save(&mut self, _entries: &[AddressEntry]) -> Result<(), StoreError> {
            Err(StoreError::Encode("read-only".to_owned()))
        }
    }

    fn at(label: &str, lat: f64, lon: f64) -> AddressEntry {
        AddressEntry::new(label, Some(Coordinate::new(lat, lon)))
    }

    fn abc_session() -> Session<MemoryStore> {
        let store = MemoryStore::with_entries(vec![
            at("A", 0.0, 1.0),
            at("B", 0.0, 3.0),
            at("C", 0.0, 2.0),
        ]);
        Session::open(store, PositionThrottle::disabled())
    }

    fn row_labels(snapshot: &Snapshot) -> Vec<&str> {
        snapshot.rows.iter().map(|r| r.label.as_str()).collect()
    }

    const ORIGIN: Coordinate = Coordinate { lat: 0.0, lon: 0.0 };

    #[test]
    fn starts_without_position() {
        let session = abc_session();
        assert_eq!(session.state(), SessionState::NoPosition);
        let snapshot = session.snapshot();
        assert_eq!(row_labels(&snapshot), ["A", "B", "C"]);
        assert!(snapshot.rows.iter().all(|r| r.rank.is_none()));
        assert_eq!(snapshot.map_action(), MapAction::None);
    }

    #[test]
    fn set_position_sorts_list_and_map_identically() {
        let mut session = abc_session();
        let PositionUpdate::Recomputed(snapshot) = session.set_position(ORIGIN) else {
            panic!("first position must recompute");
        };
        assert_eq!(session.state(), SessionState::HasPosition(ORIGIN));
        assert_eq!(row_labels(&snapshot), ["A", "C", "B"]);

        let map_labels: Vec<_> = snapshot.map.route_points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(map_labels, row_labels(&snapshot));
        let row_ids: Vec<_> = snapshot.rows.iter().map(|r| r.id).collect();
        let map_ids: Vec<_> = snapshot.map.route_points.iter().map(|p| p.id).collect();
        assert_eq!(row_ids, map_ids);
    }

    #[test]
    fn remove_by_label_persists_and_recomputes_with_current_position() {
        let mut session = abc_session();
        session.set_position(ORIGIN);

        let snapshot = session.remove_by_label("A").expect("A should exist");
        let stored: Vec<_> = session.store().entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(stored, ["B", "C"]);
        assert_eq!(session.store().save_count(), 1);

        assert_eq!(snapshot.position, Some(ORIGIN));
        assert_eq!(row_labels(&snapshot), ["C", "B"]);
        assert_eq!(snapshot.rows[0].rank, Some(1));
    }

    #[test]
    fn remove_by_id_targets_one_of_two_identical_labels() {
        let mut session = Session::open(
            MemoryStore::with_entries(vec![at("Depot", 0.0, 1.0), at("Depot", 0.0, 2.0)]),
            PositionThrottle::disabled(),
        );
        let second = session.entries()[1].id;

        session.remove_entry(second).expect("entry should exist");
        assert_eq!(session.entries().len(), 1);
        assert_eq!(session.entries()[0].lon, Some(1.0));
    }

    #[test]
    fn removing_unknown_entry_is_a_no_op() {
        let mut session = abc_session();
        assert!(session.remove_by_label("Z").is_none());
        assert!(session.remove_entry(EntryId::new()).is_none());
        assert_eq!(session.entries().len(), 3);
        assert_eq!(session.store().save_count(), 0);
    }

    #[test]
    fn add_entry_appends_persists_and_ranks() {
        let mut session = Session::open(MemoryStore::new(), PositionThrottle::disabled());
        session.set_position(ORIGIN);

        let (id, snapshot) = session
            .add_entry("  Rua Augusta, 500  ", Some(Coordinate::new(0.0, 0.5)))
            .expect("label is not blank");
        assert_eq!(session.store().entries().len(), 1);
        assert_eq!(session.store().entries()[0].label, "Rua Augusta, 500");
        assert_eq!(snapshot.rows[0].id, id);
        assert_eq!(snapshot.rows[0].rank, Some(1));
        assert!(matches!(snapshot.map_action(), MapAction::DrawPath { .. }));
    }

    #[test]
    fn add_entry_without_coordinates_goes_last() {
        let mut session = abc_session();
        session.set_position(ORIGIN);
        let (_, snapshot) = session.add_entry("Unknown street", None).unwrap();
        let last = snapshot.rows.last().unwrap();
        assert_eq!(last.label, "Unknown street");
        assert!(!last.has_coords);
        assert_eq!(snapshot.map.route_points.len(), 3);
    }

    #[test]
    fn stored_out_of_range_entry_is_not_routed() {
        let bogus: AddressEntry =
            serde_json::from_str(r#"{"label":"bogus","lat":500.0,"lon":10.0}"#)
                .expect("should parse");
        let store = MemoryStore::with_entries(vec![bogus, at("A", 0.0, 1.0)]);
        let mut session = Session::open(store, PositionThrottle::disabled());

        let PositionUpdate::Recomputed(snapshot) = session.set_position(ORIGIN) else {
            panic!("first fix should recompute");
        };
        assert_eq!(row_labels(&snapshot), ["A", "bogus"]);
        let last = snapshot.rows.last().unwrap();
        assert_eq!(last.rank, None);
        assert_eq!(last.distance_km, None);
        assert!(!last.has_coords);
        assert_eq!(snapshot.map.route_points.len(), 1);
    }

    #[test]
    fn blank_label_is_rejected() {
        let mut session = abc_session();
        assert!(matches!(
            session.add_entry("   ", None),
            Err(CoreError::EmptyLabel)
        ));
        assert_eq!(session.entries().len(), 3);
    }

    #[test]
    fn unreadable_store_starts_empty_and_survives_failed_saves() {
        let mut session = Session::open(BrokenStore, PositionThrottle::disabled());
        assert!(session.entries().is_empty());

        let (_, snapshot) = session.add_entry("Rua Direita, 1", None).unwrap();
        assert_eq!(snapshot.rows.len(), 1);
    }

    #[test]
    fn location_failure_before_fix_keeps_no_position() {
        let session = abc_session();
        let snapshot = session.location_unavailable("permission denied");
        assert_eq!(session.state(), SessionState::NoPosition);
        assert!(snapshot.position.is_none());
        assert_eq!(snapshot.map_action(), MapAction::None);
    }

    #[test]
    fn location_failure_never_clears_known_position() {
        let mut session = abc_session();
        session.set_position(ORIGIN);
        let snapshot = session.location_unavailable("timeout");
        assert_eq!(session.state(), SessionState::HasPosition(ORIGIN));
        assert_eq!(snapshot.position, Some(ORIGIN));
    }

    #[test]
    fn invalid_position_is_rejected() {
        let mut session = abc_session();
        let update = session.set_position(Coordinate::new(f64::NAN, 0.0));
        assert_eq!(update, PositionUpdate::Rejected);
        assert_eq!(session.state(), SessionState::NoPosition);
    }

    #[test]
    fn small_moves_are_throttled_until_refresh_interval() {
        let throttle = PositionThrottle::new(25.0, Duration::from_secs(30));
        let mut session = Session::open(MemoryStore::new(), throttle);
        let t0 = Instant::now();

        assert!(matches!(
            session.set_position_at(ORIGIN, t0),
            PositionUpdate::Recomputed(_)
        ));

        // ~11 m north, five seconds later.
        let nudge = Coordinate::new(0.0001, 0.0);
        assert_eq!(
            session.set_position_at(nudge, t0 + Duration::from_secs(5)),
            PositionUpdate::Throttled
        );
        assert_eq!(session.position(), Some(nudge), "latest position is still stored");

        assert!(matches!(
            session.set_position_at(nudge, t0 + Duration::from_secs(31)),
            PositionUpdate::Recomputed(_)
        ));
    }

    #[test]
    fn mutation_after_throttled_fix_uses_latest_position() {
        let throttle = PositionThrottle::new(25.0, Duration::from_secs(30));
        let store = MemoryStore::with_entries(vec![
            at("south", -0.0002, 0.0),
            at("north", 0.00025, 0.0),
        ]);
        let mut session = Session::open(store, throttle);
        let t0 = Instant::now();

        let PositionUpdate::Recomputed(snapshot) = session.set_position_at(ORIGIN, t0) else {
            panic!("first fix should recompute");
        };
        assert_eq!(row_labels(&snapshot), ["south", "north"]);

        let nudge = Coordinate::new(0.0001, 0.0);
        assert_eq!(
            session.set_position_at(nudge, t0 + Duration::from_secs(5)),
            PositionUpdate::Throttled
        );

        let (_, snapshot) = session.add_entry("Unknown street", None).unwrap();
        assert_eq!(snapshot.position, Some(nudge));
        assert_eq!(row_labels(&snapshot), ["north", "south", "Unknown street"]);
        assert_eq!(snapshot.rows[0].rank, Some(1));
        assert_eq!(snapshot.map.self_point, Some(nudge));
    }

    #[test]
    fn large_moves_always_recompute() {
        let mut session = Session::open(MemoryStore::new(), PositionThrottle::default());
        let t0 = Instant::now();
        session.set_position_at(ORIGIN, t0);

        let moved = Coordinate::new(0.01, 0.0);
        assert!(matches!(
            session.set_position_at(moved, t0 + Duration::from_secs(1)),
            PositionUpdate::Recomputed(_)
        ));
    }
}
