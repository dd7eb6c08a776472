//! Ratatui front-end: the search form, its controller, and the lyrics screen.

mod app;
mod controller;
mod forms;
mod helpers;
mod history;
mod router;
mod screens;
mod terminal;

pub use app::App;
pub use history::SearchHistory;
pub use terminal::run_app;
