use serde::{Deserialize, Serialize};

/// One retry-cycle entry in a job's timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEvent {
    /// Retry cycle number, starting at 1.
    pub iteration: u32,
    /// `"PASS"` marks a passing cycle; any other value is a fail.
    pub status: String,
    /// Opaque display string, rendered as-is.
    pub timestamp: String,
}

impl TimelineEvent {
    pub fn is_pass(&self) -> bool {
        self.status == "PASS"
    }
}
