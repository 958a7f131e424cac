//! Per-call polling loop
//!
//! A session owns the last status it observed for its call; nothing else
//! reads or writes it. Each tick queries the provider once, bounded by the
//! query timeout. When the answer differs from the last status the session
//! persists it, reports it and raises an alert, in that order. A terminal
//! status ends the session after it has been reported.

use std::sync::Arc;

use dialwatch_call_core::{CallError, CallId, CallResult, CallStatus};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::events::{CallAlert, EndReason, OutputTarget, TrackerEvent};
use crate::tracker::TrackerShared;

/// Registry entry for a running session
pub(crate) struct SessionHandle {
    pub(crate) session_id: u64,
    pub(crate) cancel: CancellationToken,
    pub(crate) task: tokio::task::JoinHandle<()>,
}

pub(crate) struct TrackingSession {
    session_id: u64,
    call_id: CallId,
    last_status: CallStatus,
    target: OutputTarget,
    cancel: CancellationToken,
    shared: Arc<TrackerShared>,
}

impl TrackingSession {
    pub(crate) fn new(
        session_id: u64,
        call_id: CallId,
        target: OutputTarget,
        cancel: CancellationToken,
        shared: Arc<TrackerShared>,
    ) -> Self {
        Self {
            session_id,
            call_id,
            last_status: CallStatus::Initiated,
            target,
            cancel,
            shared,
        }
    }

    pub(crate) async fn run(mut self) {
        let period = self.shared.config.poll_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(session_id = self.session_id, ?period, "Tracking session running");

        let reason = loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break EndReason::Cancelled,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break EndReason::Cancelled,
                result = self.query() => result,
            };

            if let Some(terminal) = self.apply(result).await {
                break EndReason::Terminal(terminal);
            }
        };

        self.finish(reason);
    }

    async fn query(&self) -> CallResult<CallStatus> {
        let timeout = self.shared.config.query_timeout();
        match tokio::time::timeout(timeout, self.shared.provider.query_status(&self.call_id)).await
        {
            Ok(result) => result,
            Err(_) => Err(CallError::Timeout {
                millis: timeout.as_millis() as u64,
            }),
        }
    }

    /// Handle one query result; returns the status if it is terminal
    async fn apply(&mut self, result: CallResult<CallStatus>) -> Option<CallStatus> {
        let status = match result {
            Ok(status) => status,
            Err(err) => {
                warn!(call_id = %self.call_id, error = %err, "Status poll failed");
                self.target.send(TrackerEvent::PollFailed {
                    call_id: self.call_id.clone(),
                    error: err.to_string(),
                });
                return None;
            }
        };

        if status == self.last_status {
            trace!(call_id = %self.call_id, %status, "Status unchanged");
            return None;
        }

        let previous = std::mem::replace(&mut self.last_status, status.clone());
        info!(call_id = %self.call_id, %previous, %status, "Call status changed");

        if let Err(err) = self.shared.store.update_status(&self.call_id, &status).await {
            error!(call_id = %self.call_id, %status, error = %err, "Failed to persist call status");
            self.target.send(TrackerEvent::PersistFailed {
                call_id: self.call_id.clone(),
                status: status.clone(),
                error: err.to_string(),
            });
        }

        self.target.send(TrackerEvent::StatusChanged {
            call_id: self.call_id.clone(),
            previous,
            status: status.clone(),
        });

        if let Some(alert) = CallAlert::for_status(&self.call_id, &status) {
            self.shared.notifier.notify(alert);
        }

        status.is_terminal().then_some(status)
    }

    fn finish(self, reason: EndReason) {
        if let EndReason::Terminal(status) = &reason {
            info!(call_id = %self.call_id, %status, "Call reached terminal status, tracking stopped");
            // A stop followed by a restart may already have replaced this entry
            let session_id = self.session_id;
            self.shared
                .sessions
                .remove_if(&self.call_id, |_, handle| handle.session_id == session_id);
        } else {
            debug!(call_id = %self.call_id, "Tracking session cancelled");
        }

        self.target.send(TrackerEvent::TrackingEnded {
            call_id: self.call_id,
            reason,
        });
    }
}
