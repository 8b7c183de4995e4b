//! Text rendering of a session snapshot. Consumes snapshots, never recomputes.

use std::fmt::Write;

use droproute_core::{MapAction, Snapshot, DEFAULT_VIEW};

pub(crate) fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    match snapshot.position {
        Some(p) => {
            let _ = writeln!(out, "Position: {p}");
        }
        None => out.push_str("Position: unknown (list not sorted)\n"),
    }

    let stops = snapshot.map.route_points.len();
    if snapshot.position.is_some() && stops > 0 {
        let _ = writeln!(
            out,
            "Route: {stops} stop(s), {:.2} km straight-line",
            snapshot.map.path_length_km()
        );
    }

    if snapshot.rows.is_empty() {
        out.push_str("  (no addresses)\n");
    }
    for row in &snapshot.rows {
        let _ = write!(out, "{row}");
        if !row.has_coords {
            out.push_str(" [no coordinates]");
        }
        let _ = writeln!(out, "  #{}", row.id);
    }

    let _ = match snapshot.map_action() {
        MapAction::DrawPath {
            points,
            bounds,
            padding_px,
        } => writeln!(
            out,
            "Map: path through {} points, fit {} .. {} (padding {padding_px}px)",
            points.len(),
            bounds.south_west,
            bounds.north_east
        ),
        MapAction::CenterOn { point, zoom } => {
            writeln!(out, "Map: center on {point} at zoom {zoom}")
        }
        MapAction::None => writeln!(
            out,
            "Map: default view {} at zoom {}",
            DEFAULT_VIEW.0, DEFAULT_VIEW.1
        ),
    };

    out
}
