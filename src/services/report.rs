use std::fs;
use std::path::{Path, PathBuf};

use crate::models::job::RunStatus;

/// Prefix for exported report filenames.
pub const REPORT_PREFIX: &str = "fixwatch-report";

/// How much of the job id goes into the filename.
const JOB_ID_SLICE_LEN: usize = 8;

/// Deterministic report filename for a job: the prefix plus the first eight
/// characters of the job id (or the whole id when shorter).
pub fn report_filename(job_id: &str) -> String {
    let short: String = job_id.chars().take(JOB_ID_SLICE_LEN).collect();
    format!("{REPORT_PREFIX}-{short}.json")
}

/// Serialize a snapshot verbatim as a pretty-printed JSON document under
/// `dir`, returning the written path. Parsing the document back yields a
/// value equal to the original snapshot.
pub fn write_report(dir: &Path, status: &RunStatus) -> Result<PathBuf, ReportError> {
    let path = dir.join(report_filename(&status.job_id));
    let body = serde_json::to_string_pretty(status)?;
    fs::write(&path, body)?;
    Ok(path)
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report file: {0}")]
    Io(#[from] std::io::Error),
}
