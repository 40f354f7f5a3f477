use serde::{Deserialize, Serialize};
use strum::Display;

/// Fix status value the backend uses for fully AI-applied patches. Anything
/// else renders as the annotated fallback.
pub const AI_FIXED: &str = "AI_FIXED";

/// Display category for a fix's bug tag.
///
/// The wire tag is open-ended, so this is derived on demand rather than
/// enforced at deserialization time; unknown tags fall back to `Logic`.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BugCategory {
    Linting,
    Syntax,
    Logic,
    TypeError,
    Import,
    Indentation,
}

/// One applied (or annotated) fix reported for a job, in application order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixRecord {
    pub file: String,
    /// Categorical tag such as `LINTING` or `SYNTAX`. Kept as the raw string
    /// so unrecognized tags survive a report round-trip.
    pub bug_type: String,
    pub line_number: u32,
    /// Free text, conventionally "before → after".
    pub commit_message: String,
    pub status: String,
}

impl FixRecord {
    /// Display category for this fix, defaulting to `Logic` for unknown tags.
    pub fn category(&self) -> BugCategory {
        match self.bug_type.trim().to_ascii_uppercase().as_str() {
            "LINTING" => BugCategory::Linting,
            "SYNTAX" => BugCategory::Syntax,
            "TYPE_ERROR" => BugCategory::TypeError,
            "IMPORT" => BugCategory::Import,
            "INDENTATION" => BugCategory::Indentation,
            _ => BugCategory::Logic,
        }
    }

    pub fn is_ai_fixed(&self) -> bool {
        self.status == AI_FIXED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(bug_type: &str, status: &str) -> FixRecord {
        FixRecord {
            file: "src/app.py".to_string(),
            bug_type: bug_type.to_string(),
            line_number: 42,
            commit_message: "broken import → Fix: restored module path".to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_known_categories() {
        assert_eq!(fix("LINTING", AI_FIXED).category(), BugCategory::Linting);
        assert_eq!(fix("TYPE_ERROR", AI_FIXED).category(), BugCategory::TypeError);
        assert_eq!(fix("INDENTATION", AI_FIXED).category(), BugCategory::Indentation);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_logic() {
        assert_eq!(fix("HEAP_CORRUPTION", AI_FIXED).category(), BugCategory::Logic);
        assert_eq!(fix("", AI_FIXED).category(), BugCategory::Logic);
    }

    #[test]
    fn test_category_is_case_and_whitespace_tolerant() {
        assert_eq!(fix(" syntax ", AI_FIXED).category(), BugCategory::Syntax);
    }

    #[test]
    fn test_non_ai_status_is_fallback() {
        assert!(fix("SYNTAX", AI_FIXED).is_ai_fixed());
        assert!(!fix("SYNTAX", "DOCUMENTED").is_ai_fixed());
        assert!(!fix("SYNTAX", "ai_fixed").is_ai_fixed());
    }
}
