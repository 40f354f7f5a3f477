//! Polling controller lifecycle tests.
//!
//! These run on a paused tokio clock so timer behavior is deterministic:
//! time only moves when every task is idle or `advance` is called, which
//! stands in for the injected scheduler the poller is designed against.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::advance;

use fixwatch::models::job::{JobState, RunStatus};
use fixwatch::services::poller::{JobMonitor, DEFAULT_POLL_INTERVAL};
use fixwatch::services::transport::{
    RunAgentRequest, RunAgentResponse, StatusTransport, TransportError,
};

fn snapshot(job_id: &str, state: JobState) -> RunStatus {
    RunStatus {
        job_id: job_id.to_string(),
        status: state,
        repo_url: "https://github.com/acme/widgets".to_string(),
        branch_name: String::new(),
        failures_detected: 0,
        fixes_applied: 0,
        iterations_used: 0,
        retry_limit: 5,
        total_time_seconds: 0.0,
        score: 0.0,
        fixes: Vec::new(),
        timeline: Vec::new(),
        raw_logs: String::new(),
        notification: None,
    }
}

/// Plays back a fixed script of replies, then repeats the fallback (if any).
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RunStatus, ()>>>,
    fallback: Option<RunStatus>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<RunStatus, ()>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn repeating(status: RunStatus) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(status),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusTransport for ScriptedTransport {
    async fn get_status(&self, _job_id: &str) -> Result<RunStatus, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(status)) => Ok(status),
            Some(Err(())) => Err(TransportError::Unavailable("scripted outage".to_string())),
            None => match &self.fallback {
                Some(status) => Ok(status.clone()),
                None => Err(TransportError::Unavailable("script exhausted".to_string())),
            },
        }
    }

    async fn run_agent(
        &self,
        _request: &RunAgentRequest,
    ) -> Result<RunAgentResponse, TransportError> {
        Ok(RunAgentResponse {
            job_id: "scripted-job".to_string(),
        })
    }
}

/// Routes by job id: the slow job answers after a delay, the fast one
/// immediately. Used to prove the stale-response guard.
struct RoutedTransport {
    slow_delay: Duration,
}

#[async_trait]
impl StatusTransport for RoutedTransport {
    async fn get_status(&self, job_id: &str) -> Result<RunStatus, TransportError> {
        match job_id {
            "slow-job" => {
                tokio::time::sleep(self.slow_delay).await;
                Ok(snapshot("slow-job", JobState::Running))
            }
            "fast-job" => Ok(snapshot("fast-job", JobState::Passed)),
            other => Err(TransportError::Unavailable(format!("unknown job {other}"))),
        }
    }

    async fn run_agent(
        &self,
        _request: &RunAgentRequest,
    ) -> Result<RunAgentResponse, TransportError> {
        Err(TransportError::Unavailable("not under test".to_string()))
    }
}

/// Await published snapshots until a terminal one arrives, collecting the
/// observed status sequence.
async fn collect_until_terminal(monitor: &JobMonitor) -> Vec<RunStatus> {
    let mut rx = monitor.subscribe();
    let mut seen = Vec::new();
    loop {
        tokio_test::assert_ok!(rx.changed().await, "monitor dropped mid-watch");
        let value = rx.borrow_and_update().clone();
        if let Some(status) = value {
            let terminal = status.is_terminal();
            seen.push(status);
            if terminal {
                return seen;
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_polls_immediately_then_stops_on_terminal() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Ok(snapshot("job-1", JobState::Queued)),
        Ok(snapshot("job-1", JobState::Running)),
        Ok(snapshot("job-1", JobState::Fixing)),
        Ok(snapshot("job-1", JobState::Passed)),
    ]));
    let monitor = JobMonitor::new(transport.clone(), DEFAULT_POLL_INTERVAL);

    monitor.watch("job-1");
    let seen = collect_until_terminal(&monitor).await;

    let states: Vec<JobState> = seen.iter().map(|s| s.status).collect();
    assert_eq!(
        states,
        vec![
            JobState::Queued,
            JobState::Running,
            JobState::Fixing,
            JobState::Passed
        ]
    );
    assert_eq!(transport.calls(), 4);

    // Terminal status implies stop: the timer is gone, so no amount of
    // elapsed time produces another fetch.
    advance(DEFAULT_POLL_INTERVAL * 10).await;
    assert_eq!(transport.calls(), 4);

    // The last snapshot stays visible until reset.
    assert_eq!(monitor.latest().unwrap().status, JobState::Passed);
    monitor.reset();
    assert!(monitor.latest().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_is_skipped_and_polling_continues() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Ok(snapshot("job-1", JobState::Running)),
        Err(()),
        Ok(snapshot("job-1", JobState::Passed)),
    ]));
    let monitor = JobMonitor::new(transport.clone(), DEFAULT_POLL_INTERVAL);

    monitor.watch("job-1");
    let seen = collect_until_terminal(&monitor).await;

    // The outage tick published nothing; the running snapshot stayed
    // authoritative until the next successful fetch.
    let states: Vec<JobState> = seen.iter().map(|s| s.status).collect();
    assert_eq!(states, vec![JobState::Running, JobState::Passed]);
    assert_eq!(transport.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_stop_halts_polling_and_is_idempotent() {
    let transport = Arc::new(ScriptedTransport::repeating(snapshot(
        "job-1",
        JobState::Running,
    )));
    let monitor = JobMonitor::new(transport.clone(), DEFAULT_POLL_INTERVAL);

    monitor.watch("job-1");

    // Wait for the immediate first snapshot.
    let mut rx = monitor.subscribe();
    loop {
        rx.changed().await.unwrap();
        if rx.borrow_and_update().is_some() {
            break;
        }
    }

    monitor.stop();
    let calls_at_stop = transport.calls();

    advance(DEFAULT_POLL_INTERVAL * 10).await;
    assert_eq!(transport.calls(), calls_at_stop);

    // Idempotent: stopping again is a no-op, and the snapshot survives
    // until reset.
    monitor.stop();
    assert!(monitor.latest().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_cannot_overwrite_new_session() {
    let transport = Arc::new(RoutedTransport {
        slow_delay: Duration::from_secs(3),
    });
    let monitor = JobMonitor::new(transport.clone(), DEFAULT_POLL_INTERVAL);

    // First session: the fetch for slow-job is now in flight.
    monitor.watch("slow-job");
    tokio::task::yield_now().await;

    // Re-watch before it resolves. The slow response will complete later
    // (its sleep still elapses) but must be rejected by the session token.
    monitor.watch("fast-job");
    let seen = collect_until_terminal(&monitor).await;

    assert!(seen.iter().all(|s| s.job_id == "fast-job"));

    // Give the stale response ample time to resolve, then confirm it never
    // landed.
    advance(Duration::from_secs(30)).await;
    assert_eq!(monitor.latest().unwrap().job_id, "fast-job");
}

#[tokio::test(start_paused = true)]
async fn test_rewatch_clears_previous_snapshot_first() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Ok(snapshot("job-1", JobState::Passed)),
        Ok(snapshot("job-2", JobState::Passed)),
    ]));
    let monitor = JobMonitor::new(transport.clone(), DEFAULT_POLL_INTERVAL);

    monitor.watch("job-1");
    collect_until_terminal(&monitor).await;
    assert_eq!(monitor.latest().unwrap().job_id, "job-1");

    monitor.watch("job-2");
    // The stale snapshot is discarded synchronously at watch-start.
    let cleared = monitor.latest().is_none();
    assert!(cleared);

    let seen = collect_until_terminal(&monitor).await;
    assert_eq!(seen.last().unwrap().job_id, "job-2");
}
