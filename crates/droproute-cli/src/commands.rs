//! Subcommand handlers. Each one opens a session, applies one change and
//! prints the resulting snapshot.

use droproute_core::{AppConfig, Coordinate, EntryId, Session};
use droproute_geocode::{
    suggest_debounced, ClientOptions, Debouncer, GeoapifyClient, NominatimClient,
};
use droproute_store::JsonFileStore;

use crate::render::render;

pub(crate) struct Context {
    pub(crate) config: AppConfig,
    pub(crate) nominatim: NominatimClient,
    geoapify: GeoapifyClient,
}

impl Context {
    pub(crate) fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let options = ClientOptions {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        };
        let nominatim = NominatimClient::with_base_url(&options, &config.nominatim_url)?;
        let geoapify = GeoapifyClient::with_base_url(
            &options,
            &config.geoapify_url,
            config.geoapify_api_key.clone(),
            config.autocomplete_limit,
            &config.autocomplete_lang,
        )?;
        Ok(Self {
            config: config.clone(),
            nominatim,
            geoapify,
        })
    }

    /// Opens the stored list, seeding the position when one was given.
    pub(crate) fn open_session(&self, from: Option<Coordinate>) -> Session<JsonFileStore> {
        let store = JsonFileStore::new(&self.config.store_path);
        tracing::debug!(path = %store.path().display(), "opening address list");
        let mut session = Session::open(store, self.config.position_throttle());
        if let Some(position) = from {
            session.set_position(position);
        }
        session
    }
}

pub(crate) async fn run_add(
    ctx: &Context,
    from: Option<Coordinate>,
    address: &str,
    coords: Option<Coordinate>,
) -> anyhow::Result<()> {
    let coords = match coords {
        Some(c) => Some(c),
        None => ctx.nominatim.geocode_or_none(address).await,
    };

    let mut session = ctx.open_session(from);
    let (id, snapshot) = session.add_entry(address, coords)?;

    match coords {
        Some(c) => println!("added {id} at {c}"),
        None => println!("added {id} without coordinates (address could not be located)"),
    }
    print!("{}", render(&snapshot));
    Ok(())
}

pub(crate) fn run_remove(
    ctx: &Context,
    from: Option<Coordinate>,
    target: &str,
) -> anyhow::Result<()> {
    let mut session = ctx.open_session(from);
    let removed = match target.parse::<EntryId>() {
        Ok(id) => session.remove_entry(id),
        Err(_) => session.remove_by_label(target),
    };

    let Some(snapshot) = removed else {
        anyhow::bail!("no entry matches '{target}'");
    };
    println!("removed {target}");
    print!("{}", render(&snapshot));
    Ok(())
}

pub(crate) fn run_list(ctx: &Context, from: Option<Coordinate>) {
    let session = ctx.open_session(from);
    print!("{}", render(&session.snapshot()));
}

pub(crate) async fn run_suggest(ctx: &Context, text: &str) {
    let debouncer = Debouncer::new(ctx.config.autocomplete_debounce());
    let suggestions = suggest_debounced(
        &ctx.geoapify,
        &debouncer,
        text,
        ctx.config.autocomplete_min_chars,
    )
    .await
    .unwrap_or_default();

    if suggestions.is_empty() {
        println!("no suggestions");
    }
    for suggestion in suggestions {
        println!("{suggestion}");
    }
}

pub(crate) async fn run_where(ctx: &Context, at: Coordinate) {
    let name = ctx.nominatim.place_name_or_unknown(at).await;
    println!(
        "Your location: Lat {:.5}, Lng {:.5} ({name})",
        at.lat, at.lon
    );
}
