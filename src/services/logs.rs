use strum::Display;

/// Substrings marking tool-chatter lines that are dropped before display.
const NOISE_MARKERS: [&str; 3] = ["WARNING: Running pip", "[notice]", "To update, run:"];

/// Display category assigned to a surviving log line. A pure display hint;
/// the line text itself is never altered.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum LogCategory {
    Error,
    Success,
    Warning,
    Agent,
    Neutral,
}

/// One log line with its display category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub text: String,
    pub category: LogCategory,
}

/// Normalize a raw log blob into ordered, classified lines.
///
/// Noise lines (pip upgrade chatter) and blank lines are dropped; the
/// relative order of everything else is preserved. Deterministic and
/// side-effect-free; empty input yields an empty sequence.
pub fn normalize(raw_logs: &str) -> Vec<ClassifiedLine> {
    raw_logs
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !NOISE_MARKERS.iter().any(|marker| line.contains(marker)))
        .map(|line| ClassifiedLine {
            text: line.to_string(),
            category: classify(line),
        })
        .collect()
}

/// First-match keyword classification, in priority order.
fn classify(line: &str) -> LogCategory {
    if line.contains("FAILED") || line.contains("Error") {
        LogCategory::Error
    } else if line.contains("PASS") || line.contains("OK") {
        LogCategory::Success
    } else if line.contains("WARNING") || line.contains("Iteration") {
        LogCategory::Warning
    } else if line.contains("Agent") || line.contains("Resolved") {
        LogCategory::Agent
    } else {
        LogCategory::Neutral
    }
}
