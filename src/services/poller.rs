use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::models::job::RunStatus;
use crate::services::transport::StatusTransport;

/// Fixed poll period between status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Drives the lifecycle of "a job is currently being watched".
///
/// `watch` fetches the job status once immediately, then on a fixed period
/// until `stop()` is called or a fetched snapshot is terminal. Each successful
/// fetch replaces the published snapshot wholesale; a failed fetch is logged
/// and skipped, leaving the previous snapshot authoritative.
///
/// In-flight requests cannot be aborted, so every poll carries the session
/// token captured at watch-start and re-checks it after each await. A late
/// response for a stale or reset job therefore never overwrites the current
/// view, regardless of timer cancellation.
pub struct JobMonitor {
    transport: Arc<dyn StatusTransport>,
    poll_interval: Duration,
    session: Arc<AtomicU64>,
    tx: watch::Sender<Option<RunStatus>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl JobMonitor {
    pub fn new(transport: Arc<dyn StatusTransport>, poll_interval: Duration) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            transport,
            poll_interval,
            session: Arc::new(AtomicU64::new(0)),
            tx,
            task: Mutex::new(None),
        }
    }

    /// Start watching a job. Any previous watch session is invalidated first:
    /// its timer is cancelled and its in-flight responses are rejected by the
    /// session token, so only one job is ever watched per monitor.
    pub fn watch(&self, job_id: &str) {
        let token = self.invalidate_session();
        self.tx.send_replace(None);

        info!(job_id = %job_id, "watching job");

        let transport = Arc::clone(&self.transport);
        let session = Arc::clone(&self.session);
        let tx = self.tx.clone();
        let job_id = job_id.to_string();
        let poll_interval = self.poll_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            // First tick completes immediately; a slow fetch delays the next
            // tick rather than bursting to catch up.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if session.load(Ordering::SeqCst) != token {
                    return;
                }

                match transport.get_status(&job_id).await {
                    Ok(snapshot) => {
                        // Stale-response guard: the session may have moved on
                        // while this request was in flight.
                        if session.load(Ordering::SeqCst) != token {
                            return;
                        }
                        let terminal = snapshot.is_terminal();
                        debug!(job_id = %job_id, status = %snapshot.status, "snapshot received");
                        tx.send_replace(Some(snapshot));
                        if terminal {
                            info!(job_id = %job_id, "job reached terminal status, polling stopped");
                            return;
                        }
                    }
                    Err(e) => {
                        // Skipped update; the next scheduled tick still fires.
                        warn!(job_id = %job_id, error = %e, "status fetch failed, keeping previous snapshot");
                    }
                }
            }
        });

        if let Some(previous) = self.task.lock().expect("poller task lock").replace(handle) {
            previous.abort();
        }
    }

    /// Stop watching. Idempotent; guarantees no further snapshot is published
    /// after it returns. The last snapshot remains visible until `reset`.
    pub fn stop(&self) {
        self.invalidate_session();
        if let Some(task) = self.task.lock().expect("poller task lock").take() {
            task.abort();
        }
    }

    /// Tear down the session and discard the last snapshot.
    pub fn reset(&self) {
        self.stop();
        self.tx.send_replace(None);
    }

    /// Subscribe to snapshot updates. `None` means no snapshot yet (or reset).
    pub fn subscribe(&self) -> watch::Receiver<Option<RunStatus>> {
        self.tx.subscribe()
    }

    /// The most recently published snapshot, if any.
    pub fn latest(&self) -> Option<RunStatus> {
        self.tx.borrow().clone()
    }

    fn invalidate_session(&self) -> u64 {
        self.session.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Drop for JobMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.task.lock().expect("poller task lock").take() {
            task.abort();
        }
    }
}
