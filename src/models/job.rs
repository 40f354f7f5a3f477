use serde::{Deserialize, Serialize};
use strum::Display;

use crate::models::fix::FixRecord;
use crate::models::timeline::TimelineEvent;

/// Status of a remote repair job as reported by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Queued,
    Running,
    Fixing,
    Passed,
    Failed,
    Error,
    Finished,
    /// Any status string the client does not recognize.
    #[serde(other)]
    Unknown,
}

impl JobState {
    /// True once no further state change is expected for the job.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Passed | JobState::Failed | JobState::Error | JobState::Finished
        )
    }
}

/// Severity of a transient backend advisory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Error,
    Warning,
}

/// Transient advisory attached to a single snapshot when the backend has
/// something noteworthy to flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

/// One status snapshot of a remote repair job.
///
/// A snapshot is created fresh on every successful poll and replaces the
/// previous one wholesale. It is never merged in place; every consumer treats
/// the latest snapshot as the complete current truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunStatus {
    pub job_id: String,
    pub status: JobState,
    pub repo_url: String,
    /// Empty until the backend assigns a working branch.
    #[serde(default)]
    pub branch_name: String,
    pub failures_detected: u32,
    pub fixes_applied: u32,
    pub iterations_used: u32,
    pub retry_limit: u32,
    /// Zero or negative means "not yet known", not zero elapsed time.
    pub total_time_seconds: f64,
    /// Server-side score field. The client derives its own score card and
    /// only carries this through for report fidelity.
    #[serde(default)]
    pub score: f64,
    pub fixes: Vec<FixRecord>,
    pub timeline: Vec<TimelineEvent>,
    pub raw_logs: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
