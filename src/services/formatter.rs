use crate::models::fix::FixRecord;

/// Description used when a commit message carries no usable "before → after"
/// text.
const FALLBACK_DESCRIPTION: &str = "anomaly resolved by agent";

/// Labels stripped from the front of the extracted description,
/// case-insensitively.
const DESCRIPTION_LABELS: [&str; 3] = ["Fix:", "Fixed:", "Annotated:"];

/// Render one fix as a single human-readable ledger line.
///
/// The description is whatever follows the rightmost `→` in the commit
/// message, minus a leading `Fix:`/`Fixed:`/`Annotated:` label. Malformed
/// input (no arrow, empty message) degrades to the fallback description;
/// this never fails.
pub fn describe(fix: &FixRecord) -> String {
    let description = fix
        .commit_message
        .rfind('→')
        .map(|idx| clean_description(&fix.commit_message[idx + '→'.len_utf8()..]))
        .filter(|desc| !desc.is_empty())
        .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());

    format!(
        "{} error in {} line {} → Fix: {}",
        fix.bug_type, fix.file, fix.line_number, description
    )
}

fn clean_description(after_arrow: &str) -> String {
    let trimmed = after_arrow.trim();
    for label in DESCRIPTION_LABELS {
        // `get` rather than slicing: a multi-byte char at the label boundary
        // must not panic.
        if let Some(head) = trimmed.get(..label.len()) {
            if head.eq_ignore_ascii_case(label) {
                return trimmed[label.len()..].trim_start().to_string();
            }
        }
    }
    trimmed.to_string()
}
