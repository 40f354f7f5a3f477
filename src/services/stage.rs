use crate::models::job::JobState;

/// The four fixed pipeline phases used for progress display.
pub const PIPELINE_STAGES: [&str; 4] = ["Trace", "Parse", "Patch", "Verify"];

/// Display phase of a single pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePhase {
    Done,
    Current,
    Pending,
}

/// Map a job status onto a pipeline position in `[0, 4]`.
///
/// An index of `n` means stages `[0, n)` are done. `FAILED`, `ERROR`, and
/// unknown statuses map to 1 so the pipeline reads as having progressed past
/// the first stage instead of regressing. Stateless; recomputed per snapshot.
pub fn active_stage(state: JobState) -> usize {
    match state {
        JobState::Queued => 0,
        JobState::Running => 1,
        JobState::Fixing => 2,
        JobState::Passed | JobState::Finished => 4,
        JobState::Failed | JobState::Error | JobState::Unknown => 1,
    }
}

/// Phase of stage `index` given the job status. The stage just before the
/// active position is "current" only while the job is still non-terminal.
pub fn stage_phase(index: usize, state: JobState) -> StagePhase {
    let active = active_stage(state);
    if index < active {
        if index + 1 == active && !state.is_terminal() {
            StagePhase::Current
        } else {
            StagePhase::Done
        }
    } else {
        StagePhase::Pending
    }
}
