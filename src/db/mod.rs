//! Persistence for the optional search history.

mod connection;
mod searches;

pub use connection::{init_schema, open_history};
pub use searches::{fetch_recent_searches, record_search};
