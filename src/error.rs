use thiserror::Error;

/// Why a lyrics lookup did not produce lyrics. The UI collapses every variant
/// into the same "No lyrics found" modal; the detail only reaches the log and
/// the shared store.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lyrics request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("no lyrics found for {artist} - {song}")]
    NotFound { artist: String, song: String },
    #[error("malformed lyrics response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid lookup url: {0}")]
    InvalidUrl(String),
    #[error("failed to start lookup worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Reasons the controller refuses a submit. None of these reach the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("No internet connection.")]
    Offline,
    #[error("Artist and song are required.")]
    InvalidForm,
    #[error("A search is already running.")]
    Busy,
}
