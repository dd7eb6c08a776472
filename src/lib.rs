//! Terminal lyrics search: an artist/song form whose submit is gated on
//! validity and connectivity, an asynchronous lyrics lookup, and a lyrics
//! screen reached on success.
pub mod config;
pub mod connectivity;
pub mod db;
pub mod error;
pub mod event;
pub mod logging;
pub mod lookup;
pub mod models;
pub mod ui;

pub use config::Config;
pub use connectivity::{ConnectivityMonitor, TcpProbe};
pub use event::AppEvent;
pub use lookup::{LyricsDispatcher, LyricsOvhClient, LyricsProvider};
pub use models::{Lyrics, SearchQuery};

/// The interactive application entry point and state container.
pub use ui::{run_app, App, SearchHistory};
