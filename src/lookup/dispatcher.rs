use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use crate::error::LookupError;
use crate::event::AppEvent;
use crate::models::{Lyrics, SearchQuery};

use super::provider::LyricsProvider;

/// Tag attached to every dispatched lookup so late results can be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One lookup the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsRequest {
    pub id: RequestId,
    pub query: SearchQuery,
}

/// Result of a single submit attempt.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Success(Lyrics),
    Failure(LookupError),
}

impl From<Result<Lyrics, LookupError>> for SubmissionOutcome {
    fn from(result: Result<Lyrics, LookupError>) -> Self {
        match result {
            Ok(lyrics) => SubmissionOutcome::Success(lyrics),
            Err(err) => SubmissionOutcome::Failure(err),
        }
    }
}

/// Outcome of a dispatched lookup as delivered back to the UI loop.
#[derive(Debug)]
pub struct LookupFinished {
    pub request: RequestId,
    pub outcome: SubmissionOutcome,
}

/// Fire-and-forget seam the search controller submits through. Results come
/// back later as [`AppEvent::LookupFinished`], never as a return value.
pub trait Dispatch {
    fn request_lyrics(&mut self, request: LyricsRequest);
}

/// Shared result slice read by the lyrics screen.
#[derive(Debug, Default)]
pub struct LyricsStore {
    pub loading: bool,
    pub error: Option<String>,
    pub lyrics: Option<Lyrics>,
}

/// Runs each lookup on its own worker thread and owns the [`LyricsStore`].
pub struct LyricsDispatcher {
    provider: Arc<dyn LyricsProvider>,
    events: Sender<AppEvent>,
    store: LyricsStore,
}

impl LyricsDispatcher {
    pub fn new(provider: Arc<dyn LyricsProvider>, events: Sender<AppEvent>) -> Self {
        Self {
            provider,
            events,
            store: LyricsStore::default(),
        }
    }

    pub fn store(&self) -> &LyricsStore {
        &self.store
    }

    /// Fold a finished lookup into the store.
    pub fn complete(&mut self, outcome: &SubmissionOutcome) {
        self.store.loading = false;
        match outcome {
            SubmissionOutcome::Success(lyrics) => {
                self.store.lyrics = Some(lyrics.clone());
                self.store.error = None;
            }
            SubmissionOutcome::Failure(err) => {
                self.store.error = Some(err.to_string());
            }
        }
    }

    /// Forget about an outstanding lookup whose result will be ignored.
    pub fn abandon(&mut self) {
        self.store.loading = false;
    }
}

impl Dispatch for LyricsDispatcher {
    fn request_lyrics(&mut self, request: LyricsRequest) {
        self.store.loading = true;
        self.store.error = None;

        let provider = Arc::clone(&self.provider);
        let events = self.events.clone();
        let id = request.id;
        let spawned = thread::Builder::new()
            .name(format!("lyrics-lookup-{}", id.0))
            .spawn(move || {
                let outcome = provider.fetch_lyrics(&request.query).into();
                deliver(
                    &events,
                    LookupFinished {
                        request: request.id,
                        outcome,
                    },
                );
            });

        if let Err(err) = spawned {
            warn!(request = %id, error = %err, "could not start lookup worker");
            deliver(
                &self.events,
                LookupFinished {
                    request: id,
                    outcome: SubmissionOutcome::Failure(err.into()),
                },
            );
        }
    }
}

/// Post a finished lookup to the UI loop. Returns `false` once the loop is gone.
fn deliver(events: &Sender<AppEvent>, finished: LookupFinished) -> bool {
    let request = finished.request;
    if events.send(AppEvent::LookupFinished(finished)).is_err() {
        debug!(request = %request, "lookup finished after the UI loop exited");
        return false;
    }
    true
}
