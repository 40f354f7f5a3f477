use crate::models::job::RunStatus;

// Product constants carried over from the backend's scoring rules.
// No rationale is documented for the thresholds; they are preserved as-is.

/// Every scored run starts from this many points.
pub const BASELINE: i64 = 100;

/// Flat bonus for finishing inside the velocity window.
pub const VELOCITY_BONUS: i64 = 10;

/// Runs faster than this (and with a known elapsed time) earn the bonus.
pub const VELOCITY_WINDOW_SECONDS: f64 = 300.0;

/// Fixes beyond this count are penalized.
pub const COMMIT_SOFT_LIMIT: usize = 20;

/// Penalty per fix over the soft limit.
pub const COMMIT_PENALTY_PER_FIX: i64 = 2;

/// Final score bounds.
pub const SCORE_FLOOR: i64 = 0;
pub const SCORE_CAP: i64 = 110;

/// One named adjustment in a score breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreAdjustment {
    pub label: &'static str,
    pub delta: i64,
}

/// Derived performance score for a terminal snapshot.
///
/// `breakdown` entries sum to the pre-clamp total; `total` is that sum
/// clamped to `[SCORE_FLOOR, SCORE_CAP]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    pub total: i64,
    pub breakdown: Vec<ScoreAdjustment>,
}

impl ScoreCard {
    /// Sum of the breakdown before clamping.
    pub fn unclamped_total(&self) -> i64 {
        self.breakdown.iter().map(|a| a.delta).sum()
    }
}

/// Score a snapshot. Returns `None` while the job is non-terminal: a running
/// job is unscored, never partially scored.
pub fn score(status: &RunStatus) -> Option<ScoreCard> {
    if !status.is_terminal() {
        return None;
    }

    let mut breakdown = vec![ScoreAdjustment {
        label: "Baseline",
        delta: BASELINE,
    }];

    if status.total_time_seconds > 0.0 && status.total_time_seconds < VELOCITY_WINDOW_SECONDS {
        breakdown.push(ScoreAdjustment {
            label: "Velocity Bonus",
            delta: VELOCITY_BONUS,
        });
    }

    if status.fixes.len() > COMMIT_SOFT_LIMIT {
        let penalty = COMMIT_PENALTY_PER_FIX * (status.fixes.len() - COMMIT_SOFT_LIMIT) as i64;
        breakdown.push(ScoreAdjustment {
            label: "Commit Overhead",
            delta: -penalty,
        });
    }

    let total = breakdown
        .iter()
        .map(|a| a.delta)
        .sum::<i64>()
        .clamp(SCORE_FLOOR, SCORE_CAP);

    Some(ScoreCard { total, breakdown })
}
