//! Binary entry point: load configuration, start logging and the background
//! services, then drive the Ratatui event loop until the user exits.
use std::sync::{mpsc, Arc};

use lyrics_search::config::data_dir;
use lyrics_search::db::open_history;
use lyrics_search::{
    logging, run_app, App, Config, ConnectivityMonitor, LyricsDispatcher, LyricsOvhClient,
    SearchHistory, TcpProbe,
};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    let dir = data_dir()?;
    logging::init(&config.logging, &dir)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting lyrics search");

    let (events_tx, events_rx) = mpsc::channel();

    let provider = LyricsOvhClient::new(&config.lookup)?;
    let dispatcher = LyricsDispatcher::new(Arc::new(provider), events_tx.clone());

    let history = if config.features.previous_searches {
        Some(SearchHistory::load(open_history(&dir)?)?)
    } else {
        None
    };

    let probe = TcpProbe::new(
        config.connectivity.probe_address.clone(),
        config.connectivity.timeout(),
    );
    let _monitor = ConnectivityMonitor::spawn(probe, config.connectivity.interval(), events_tx)?;

    let mut app = App::new(dispatcher, history);
    let result = run_app(&mut app, events_rx);
    info!("lyrics search exited");
    result
}
