//! Search screen state machine.
//!
//! ```text
//!   Idle --submit (connected && valid)--> Submitting
//!   Submitting --success--> Idle + navigate(SongLyrics)
//!   Submitting --failure--> ErrorShown
//!   Submitting --cancel---> Idle (late result is stale)
//!   ErrorShown --dismiss--> Idle
//! ```
//!
//! Collaborators are passed in per call, so the controller never reaches for
//! globals and tests can record every side effect.

use tracing::{debug, info};

use crate::error::SubmitRejected;
use crate::lookup::{Dispatch, LyricsRequest, RequestId, SubmissionOutcome};

use super::forms::SearchForm;
use super::router::{Navigator, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchState {
    Idle,
    Submitting { request: RequestId },
    ErrorShown,
}

/// What `resolve` did with a finished lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    Navigated,
    ErrorShown,
    /// The result belonged to a request that is no longer outstanding.
    Stale,
}

pub(crate) struct SearchController {
    form: SearchForm,
    state: SearchState,
    next_request: u64,
}

impl Default for SearchController {
    fn default() -> Self {
        Self {
            form: SearchForm::default(),
            state: SearchState::Idle,
            next_request: 1,
        }
    }
}

impl SearchController {
    pub(crate) fn form(&self) -> &SearchForm {
        &self.form
    }

    pub(crate) fn form_mut(&mut self) -> &mut SearchForm {
        &mut self.form
    }

    pub(crate) fn state(&self) -> SearchState {
        self.state
    }

    pub(crate) fn error_modal_visible(&self) -> bool {
        self.state == SearchState::ErrorShown
    }

    /// Whether the submit control should be enabled right now.
    pub(crate) fn submit_enabled(&self, connected: bool) -> bool {
        self.state == SearchState::Idle && connected && self.form.is_valid()
    }

    /// True while `request` is the outstanding lookup.
    pub(crate) fn awaits(&self, request: RequestId) -> bool {
        self.state == SearchState::Submitting { request }
    }

    /// Dispatch a lookup for the current form values.
    pub(crate) fn submit<D: Dispatch>(
        &mut self,
        connected: bool,
        dispatch: &mut D,
    ) -> Result<RequestId, SubmitRejected> {
        if self.state != SearchState::Idle {
            return Err(SubmitRejected::Busy);
        }
        if !connected {
            return Err(SubmitRejected::Offline);
        }
        let Some(query) = self.form.query() else {
            self.form.touch_all();
            return Err(SubmitRejected::InvalidForm);
        };

        self.form.dismiss_keyboard();
        let id = RequestId(self.next_request);
        self.next_request += 1;
        info!(request = %id, %query, "dispatching lyrics lookup");
        dispatch.request_lyrics(LyricsRequest { id, query });
        self.state = SearchState::Submitting { request: id };
        Ok(id)
    }

    /// Apply the single outcome of `request`.
    pub(crate) fn resolve<N: Navigator>(
        &mut self,
        request: RequestId,
        outcome: &SubmissionOutcome,
        navigator: &mut N,
    ) -> Resolution {
        if !self.awaits(request) {
            debug!(request = %request, "ignoring stale lookup result");
            return Resolution::Stale;
        }
        match outcome {
            SubmissionOutcome::Success(_) => {
                self.state = SearchState::Idle;
                navigator.navigate_to(Route::SongLyrics);
                Resolution::Navigated
            }
            SubmissionOutcome::Failure(_) => {
                self.state = SearchState::ErrorShown;
                Resolution::ErrorShown
            }
        }
    }

    /// Close the error modal. Returns whether it was open.
    pub(crate) fn dismiss_error(&mut self) -> bool {
        if self.state == SearchState::ErrorShown {
            self.state = SearchState::Idle;
            true
        } else {
            false
        }
    }

    /// Abandon the outstanding lookup, if any.
    pub(crate) fn cancel(&mut self) -> Option<RequestId> {
        match self.state {
            SearchState::Submitting { request } => {
                self.state = SearchState::Idle;
                Some(request)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::models::{Lyrics, SearchQuery};

    #[derive(Default)]
    struct RecordingDispatch {
        requests: Vec<LyricsRequest>,
    }

    impl Dispatch for RecordingDispatch {
        fn request_lyrics(&mut self, request: LyricsRequest) {
            self.requests.push(request);
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        routes: Vec<Route>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate_to(&mut self, route: Route) {
            self.routes.push(route);
        }
    }

    fn controller_with(artist: &str, song: &str) -> SearchController {
        let mut controller = SearchController::default();
        let form = controller.form_mut();
        for ch in artist.chars() {
            form.push_char(ch);
        }
        form.toggle_field();
        for ch in song.chars() {
            form.push_char(ch);
        }
        controller
    }

    fn success() -> SubmissionOutcome {
        SubmissionOutcome::Success(Lyrics {
            artist: "Queen".into(),
            song: "Bohemian Rhapsody".into(),
            text: "Is this the real life?".into(),
        })
    }

    fn failure() -> SubmissionOutcome {
        SubmissionOutcome::Failure(LookupError::NotFound {
            artist: "Queen".into(),
            song: "Bohemian Rhapsody".into(),
        })
    }

    #[test]
    fn enabled_requires_valid_and_connected() {
        let empty_song = controller_with("Queen", "");
        assert!(!empty_song.submit_enabled(true));

        let full = controller_with("Queen", "Bohemian Rhapsody");
        assert!(full.submit_enabled(true));
        assert!(!full.submit_enabled(false));
    }

    #[test]
    fn offline_submit_dispatches_nothing() {
        let mut controller = controller_with("Queen", "Bohemian Rhapsody");
        let mut dispatch = RecordingDispatch::default();
        assert_eq!(
            controller.submit(false, &mut dispatch),
            Err(SubmitRejected::Offline)
        );
        assert!(dispatch.requests.is_empty());
        assert_eq!(controller.state(), SearchState::Idle);
    }

    #[test]
    fn invalid_submit_dispatches_nothing() {
        let mut controller = controller_with("Queen", "   ");
        let mut dispatch = RecordingDispatch::default();
        assert_eq!(
            controller.submit(true, &mut dispatch),
            Err(SubmitRejected::InvalidForm)
        );
        assert!(dispatch.requests.is_empty());
    }

    #[test]
    fn submit_dispatches_once_with_trimmed_values() {
        let mut controller = controller_with(" Queen ", "Bohemian Rhapsody ");
        let mut dispatch = RecordingDispatch::default();

        let id = controller.submit(true, &mut dispatch).unwrap();

        assert_eq!(
            dispatch.requests,
            vec![LyricsRequest {
                id,
                query: SearchQuery::new("Queen", "Bohemian Rhapsody").unwrap(),
            }]
        );
        assert_eq!(controller.state(), SearchState::Submitting { request: id });
        assert!(!controller.form().keyboard_visible());
        assert!(!controller.submit_enabled(true));
    }

    #[test]
    fn second_submit_while_pending_is_busy() {
        let mut controller = controller_with("Queen", "Bohemian Rhapsody");
        let mut dispatch = RecordingDispatch::default();
        controller.submit(true, &mut dispatch).unwrap();

        assert_eq!(
            controller.submit(true, &mut dispatch),
            Err(SubmitRejected::Busy)
        );
        assert_eq!(dispatch.requests.len(), 1);
    }

    #[test]
    fn success_navigates_once_without_modal() {
        let mut controller = controller_with("Queen", "Bohemian Rhapsody");
        let mut dispatch = RecordingDispatch::default();
        let mut navigator = RecordingNavigator::default();
        let id = controller.submit(true, &mut dispatch).unwrap();

        assert_eq!(
            controller.resolve(id, &success(), &mut navigator),
            Resolution::Navigated
        );
        assert_eq!(navigator.routes, vec![Route::SongLyrics]);
        assert!(!controller.error_modal_visible());
        assert_eq!(controller.state(), SearchState::Idle);

        assert_eq!(
            controller.resolve(id, &success(), &mut navigator),
            Resolution::Stale
        );
        assert_eq!(navigator.routes.len(), 1);
    }

    #[test]
    fn failure_shows_modal_without_navigation() {
        let mut controller = controller_with("Queen", "Bohemian Rhapsody");
        let mut dispatch = RecordingDispatch::default();
        let mut navigator = RecordingNavigator::default();
        let id = controller.submit(true, &mut dispatch).unwrap();

        assert_eq!(
            controller.resolve(id, &failure(), &mut navigator),
            Resolution::ErrorShown
        );
        assert!(controller.error_modal_visible());
        assert!(navigator.routes.is_empty());
        assert!(!controller.submit_enabled(true));
    }

    #[test]
    fn dismiss_returns_to_idle_and_keeps_values() {
        let mut controller = controller_with("Queen", "Bohemian Rhapsody");
        let mut dispatch = RecordingDispatch::default();
        let mut navigator = RecordingNavigator::default();
        let id = controller.submit(true, &mut dispatch).unwrap();
        controller.resolve(id, &failure(), &mut navigator);

        assert!(controller.dismiss_error());
        assert!(!controller.error_modal_visible());
        assert_eq!(controller.form().values().artist, "Queen");
        assert_eq!(controller.form().values().song, "Bohemian Rhapsody");
        assert!(!controller.dismiss_error());

        let retry = controller.submit(true, &mut dispatch).unwrap();
        assert_ne!(retry, id);
        assert_eq!(dispatch.requests.len(), 2);
    }

    #[test]
    fn cancelled_request_resolves_as_stale() {
        let mut controller = controller_with("Queen", "Bohemian Rhapsody");
        let mut dispatch = RecordingDispatch::default();
        let mut navigator = RecordingNavigator::default();
        let id = controller.submit(true, &mut dispatch).unwrap();

        assert_eq!(controller.cancel(), Some(id));
        assert_eq!(controller.cancel(), None);
        assert_eq!(
            controller.resolve(id, &failure(), &mut navigator),
            Resolution::Stale
        );
        assert!(!controller.error_modal_visible());
        assert!(navigator.routes.is_empty());
    }

    #[test]
    fn disconnect_while_submitting_still_completes() {
        let mut controller = controller_with("Queen", "Bohemian Rhapsody");
        let mut dispatch = RecordingDispatch::default();
        let mut navigator = RecordingNavigator::default();
        let id = controller.submit(true, &mut dispatch).unwrap();

        // Connectivity is only a submit gate; the pending lookup is untouched.
        assert!(!controller.submit_enabled(false));
        assert!(controller.awaits(id));
        assert_eq!(
            controller.resolve(id, &success(), &mut navigator),
            Resolution::Navigated
        );
    }
}
