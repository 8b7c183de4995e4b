mod commands;
mod render;
mod track;

use clap::{Parser, Subcommand};
use droproute_core::Coordinate;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "droproute")]
#[command(about = "Orders delivery addresses into a nearest-first route")]
struct Cli {
    /// Current position as `LAT,LON`; without it the list stays unsorted.
    #[arg(long, global = true, value_parser = parse_coordinate_arg, allow_hyphen_values = true)]
    from: Option<Coordinate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add an address, geocoding it unless coordinates are given.
    Add {
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
        /// Skip geocoding and store these coordinates (`LAT,LON`).
        #[arg(long, value_parser = parse_coordinate_arg, allow_hyphen_values = true)]
        coords: Option<Coordinate>,
    },
    /// Remove an entry by id, or the first entry with this exact label.
    Remove { target: String },
    /// Print the list and the map plan.
    List,
    /// Print autocomplete suggestions for partial input.
    Suggest {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Reverse geocode a coordinate.
    Where {
        #[arg(value_parser = parse_coordinate_arg, allow_hyphen_values = true)]
        at: Coordinate,
    },
    /// Follow `LAT,LON` lines on stdin as live position updates.
    Track,
}

/// Parses `LAT,LON` in decimal degrees.
fn parse_coordinate_arg(raw: &str) -> Result<Coordinate, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{raw}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude '{lat}': {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude '{lon}': {e}"))?;
    let coord = Coordinate::new(lat, lon);
    if !coord.is_valid() {
        return Err(format!("coordinate out of range: {raw}"));
    }
    Ok(coord)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = droproute_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    let ctx = commands::Context::new(&config)?;

    match cli.command {
        Some(Commands::Add { address, coords }) => {
            commands::run_add(&ctx, cli.from, &address.join(" "), coords).await?;
        }
        Some(Commands::Remove { target }) => commands::run_remove(&ctx, cli.from, &target)?,
        Some(Commands::List) | None => commands::run_list(&ctx, cli.from),
        Some(Commands::Suggest { text }) => commands::run_suggest(&ctx, &text.join(" ")).await,
        Some(Commands::Where { at }) => commands::run_where(&ctx, at).await,
        Some(Commands::Track) => track::run_track(&ctx, cli.from).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
