//! Registry of active tracking sessions

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use dialwatch_call_core::{CallId, StatusProvider};
use dialwatch_call_store::CallStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};

use crate::config::TrackerConfig;
use crate::events::{AlertNotifier, LogNotifier, OutputTarget};
use crate::session::{SessionHandle, TrackingSession};

/// State shared between the tracker and its sessions
pub(crate) struct TrackerShared {
    pub(crate) provider: Arc<dyn StatusProvider>,
    pub(crate) store: Arc<dyn CallStore>,
    pub(crate) notifier: Arc<dyn AlertNotifier>,
    pub(crate) config: TrackerConfig,
    pub(crate) sessions: DashMap<CallId, SessionHandle>,
    next_session_id: AtomicU64,
}

/// Tracks the lifecycle of placed calls
///
/// At most one session runs per call id. Sessions run on the tokio runtime
/// that was current when [`CallTracker::start`] was called.
#[derive(Clone)]
pub struct CallTracker {
    shared: Arc<TrackerShared>,
}

impl std::fmt::Debug for CallTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallTracker")
            .field("provider", &self.shared.provider.name())
            .field("config", &self.shared.config)
            .field("active", &self.shared.sessions.len())
            .finish()
    }
}

impl CallTracker {
    /// Tracker that reports alerts to the log
    pub fn new(
        provider: Arc<dyn StatusProvider>,
        store: Arc<dyn CallStore>,
        config: TrackerConfig,
    ) -> Self {
        Self::with_notifier(provider, store, Arc::new(LogNotifier), config)
    }

    pub fn with_notifier(
        provider: Arc<dyn StatusProvider>,
        store: Arc<dyn CallStore>,
        notifier: Arc<dyn AlertNotifier>,
        config: TrackerConfig,
    ) -> Self {
        Self {
            shared: Arc::new(TrackerShared {
                provider,
                store,
                notifier,
                config,
                sessions: DashMap::new(),
                next_session_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.shared.config
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn AlertNotifier> {
        &self.shared.notifier
    }

    /// Begin tracking `call_id`, reporting to `target`
    ///
    /// Returns `false` and changes nothing if the call is already tracked.
    /// The first status query happens one poll interval from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, call_id: CallId, target: OutputTarget) -> bool {
        match self.shared.sessions.entry(call_id.clone()) {
            Entry::Occupied(_) => {
                debug!(%call_id, "Call already tracked, ignoring start");
                false
            }
            Entry::Vacant(slot) => {
                let session_id = self.shared.next_session_id.fetch_add(1, Ordering::Relaxed);
                let cancel = CancellationToken::new();
                let session = TrackingSession::new(
                    session_id,
                    call_id.clone(),
                    target,
                    cancel.clone(),
                    self.shared.clone(),
                );
                let span = info_span!("call_tracking", call_id = %call_id, session_id);
                let task = tokio::spawn(session.run().instrument(span));

                slot.insert(SessionHandle {
                    session_id,
                    cancel,
                    task,
                });
                info!(%call_id, session_id, "Started tracking call");
                true
            }
        }
    }

    /// Stop tracking `call_id`
    ///
    /// Returns `false` if the call was not tracked. No status query starts
    /// after this returns, and a query in flight is abandoned.
    pub fn stop(&self, call_id: &CallId) -> bool {
        match self.shared.sessions.remove(call_id) {
            Some((_, handle)) => {
                handle.cancel.cancel();
                info!(%call_id, session_id = handle.session_id, "Stopped tracking call");
                true
            }
            None => {
                debug!(%call_id, "Call not tracked, nothing to stop");
                false
            }
        }
    }

    pub fn is_tracking(&self, call_id: &CallId) -> bool {
        self.shared.sessions.contains_key(call_id)
    }

    pub fn active_count(&self) -> usize {
        self.shared.sessions.len()
    }

    /// Ids of all calls currently tracked, in no particular order
    pub fn active_calls(&self) -> Vec<CallId> {
        self.shared
            .sessions
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Cancel every session and wait for their tasks to exit
    pub async fn shutdown(&self) {
        let ids = self.active_calls();
        let mut tasks = Vec::with_capacity(ids.len());
        for call_id in ids {
            if let Some((_, handle)) = self.shared.sessions.remove(&call_id) {
                handle.cancel.cancel();
                tasks.push(handle.task);
            }
        }

        let count = tasks.len();
        for task in tasks {
            let _ = task.await;
        }
        info!(count, "Call tracker shut down");
    }
}
