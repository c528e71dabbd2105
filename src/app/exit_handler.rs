//! Exit code logic for litrank runs.
//!
//! Single responsibility: map how many papers made it into the output and how
//! many were dropped or left unmatched to the process exit outcome.

use crate::ProcessExit;

/// Determines the process exit outcome for a completed run.
///
/// `written` counts papers present in the outputs; `degraded` counts rows
/// skipped during ingest plus round-trip records without a raw match.
pub(crate) fn determine_exit_outcome(written: usize, degraded: usize) -> ProcessExit {
    if degraded == 0 {
        ProcessExit::Success
    } else if written > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}
