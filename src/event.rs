use crate::lookup::LookupFinished;

/// Messages that background threads post to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// New reachability snapshot from the connectivity monitor.
    Connectivity(bool),
    /// A dispatched lookup produced its single outcome.
    LookupFinished(LookupFinished),
}
