//! Live tracking: stdin stands in for the device location provider.
//!
//! Each line is either `LAT,LON` or an error signal (`error: <reason>`).

use droproute_core::{Coordinate, PositionUpdate, SessionState};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::Context;
use crate::parse_coordinate_arg;
use crate::render::render;

#[derive(Debug, PartialEq)]
enum LocationSignal {
    Fix(Coordinate),
    Failure(String),
}

fn parse_signal(line: &str) -> Option<LocationSignal> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    if let Some(reason) = line.strip_prefix("error:") {
        return Some(LocationSignal::Failure(reason.trim().to_owned()));
    }
    Some(match parse_coordinate_arg(line) {
        Ok(coord) => LocationSignal::Fix(coord),
        Err(reason) => LocationSignal::Failure(reason),
    })
}

pub(crate) async fn run_track(ctx: &Context, from: Option<Coordinate>) -> anyhow::Result<()> {
    let mut session = ctx.open_session(None);
    let mut announced = false;

    if let Some(position) = from {
        if let PositionUpdate::Recomputed(snapshot) = session.set_position(position) {
            announce(ctx, position, &mut announced).await;
            print!("{}", render(&snapshot));
        }
    } else {
        print!("{}", render(&session.snapshot()));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_signal(&line) {
            None => {}
            Some(LocationSignal::Fix(position)) => match session.set_position(position) {
                PositionUpdate::Recomputed(snapshot) => {
                    announce(ctx, position, &mut announced).await;
                    print!("{}", render(&snapshot));
                }
                PositionUpdate::Throttled | PositionUpdate::Rejected => {}
            },
            Some(LocationSignal::Failure(reason)) => {
                let snapshot = session.location_unavailable(&reason);
                if session.state() == SessionState::NoPosition {
                    println!("Could not get your location.");
                    print!("{}", render(&snapshot));
                }
            }
        }
    }

    tracing::info!("location stream ended");
    Ok(())
}

/// Prints the place name once, on the first fix.
async fn announce(ctx: &Context, position: Coordinate, announced: &mut bool) {
    if *announced {
        return;
    }
    *announced = true;
    let name = ctx.nominatim.place_name_or_unknown(position).await;
    println!(
        "Your location: Lat {:.5}, Lng {:.5} ({name})",
        position.lat, position.lon
    );
}
