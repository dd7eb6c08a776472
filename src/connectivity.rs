//! Network reachability observer. A background thread probes on an interval
//! and posts [`AppEvent::Connectivity`] whenever the answer changes.

use std::net::{TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::event::AppEvent;

/// Answers "is the network usable right now". Unreachable is a normal value,
/// not an error.
pub trait ReachabilityProbe: Send + 'static {
    fn is_reachable(&self) -> bool;
}

/// Considers the network reachable when `address` accepts a TCP connection.
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }
}

impl ReachabilityProbe for TcpProbe {
    fn is_reachable(&self) -> bool {
        let Ok(addrs) = self.address.to_socket_addrs() else {
            return false;
        };
        addrs
            .into_iter()
            .any(|addr| TcpStream::connect_timeout(&addr, self.timeout).is_ok())
    }
}

/// Change detector between consecutive probe results.
#[derive(Debug, Default)]
pub struct ConnectivityWatch {
    last: Option<bool>,
}

impl ConnectivityWatch {
    /// Returns the new state on the first observation and on every change.
    pub fn observe(&mut self, reachable: bool) -> Option<bool> {
        if self.last == Some(reachable) {
            return None;
        }
        self.last = Some(reachable);
        Some(reachable)
    }
}

/// Handle to the probing thread. Dropping it stops the thread after its
/// current sleep.
pub struct ConnectivityMonitor {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ConnectivityMonitor {
    pub fn spawn<P: ReachabilityProbe>(
        probe: P,
        interval: Duration,
        events: Sender<AppEvent>,
    ) -> Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("connectivity".into())
            .spawn(move || {
                let mut watch = ConnectivityWatch::default();
                while !thread_stop.load(Ordering::Relaxed) {
                    if let Some(connected) = watch.observe(probe.is_reachable()) {
                        debug!(connected, "connectivity changed");
                        if events.send(AppEvent::Connectivity(connected)).is_err() {
                            break;
                        }
                    }
                    thread::sleep(interval);
                }
            })
            .context("failed to start connectivity monitor")?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        // Joining would block the UI for up to one interval.
        self.handle.take();
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::sync::Mutex;

    use super::*;

    struct ScriptedProbe {
        answers: Mutex<Vec<bool>>,
    }

    impl ReachabilityProbe for ScriptedProbe {
        fn is_reachable(&self) -> bool {
            let mut answers = self.answers.lock().unwrap();
            if answers.len() > 1 {
                answers.remove(0)
            } else {
                answers[0]
            }
        }
    }

    #[test]
    fn watch_reports_first_value_and_changes_only() {
        let mut watch = ConnectivityWatch::default();
        assert_eq!(watch.observe(false), Some(false));
        assert_eq!(watch.observe(false), None);
        assert_eq!(watch.observe(true), Some(true));
        assert_eq!(watch.observe(true), None);
        assert_eq!(watch.observe(false), Some(false));
    }

    #[test]
    fn monitor_posts_changes() {
        let (tx, rx) = mpsc::channel();
        let probe = ScriptedProbe {
            answers: Mutex::new(vec![true, true, false, false, true]),
        };
        let _monitor = ConnectivityMonitor::spawn(probe, Duration::from_millis(1), tx).unwrap();

        let mut seen = Vec::new();
        while seen.len() < 3 {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                AppEvent::Connectivity(connected) => seen.push(connected),
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(seen, vec![true, false, true]);
    }

    #[test]
    fn address_without_port_is_unreachable() {
        let probe = TcpProbe::new("no-port", Duration::from_millis(50));
        assert!(!probe.is_reachable());
    }

    #[test]
    fn local_listener_is_reachable_until_closed() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let probe = TcpProbe::new(address, Duration::from_millis(200));
        assert!(probe.is_reachable());

        drop(listener);
        assert!(!probe.is_reachable());
    }
}
