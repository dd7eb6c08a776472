//! Lyrics lookup: the provider seam, its HTTP implementation, and the
//! dispatcher that runs requests off the UI thread.

mod dispatcher;
mod provider;

pub use dispatcher::{
    Dispatch, LookupFinished, LyricsDispatcher, LyricsRequest, LyricsStore, RequestId,
    SubmissionOutcome,
};
pub use provider::{LyricsOvhClient, LyricsProvider};
