//! Helpers shared by every stage: turning executions into outcomes.

use anyhow::Result;

use crate::application::ports::{Execution, ProgressReporter};
use crate::domain::outcome::{Stage, StageFailure, StageOutcome};

/// Classify a finished (or unspawnable) command for `stage`.
///
/// A non-zero exit becomes a fatal failure carrying the command line and
/// exit code; a spawn error becomes a fatal failure with no exit code.
///
/// # Errors
///
/// Returns the [`StageFailure`] when the command did not succeed.
pub fn check(stage: Stage, res: Result<Execution>) -> Result<Execution, StageFailure> {
    match res {
        Ok(exec) if exec.success() => Ok(exec),
        Ok(exec) => Err(StageFailure::fatal(stage, exec.failure_reason(), exec.code())),
        Err(e) => Err(StageFailure::fatal(stage, format!("{e:#}"), None)),
    }
}

/// Decide whether the workflow may continue past `outcome`.
///
/// Recoverable failures are reported as warnings and swallowed.
///
/// # Errors
///
/// Returns the failure when it is not recoverable.
pub fn proceed(outcome: StageOutcome, reporter: &impl ProgressReporter) -> Result<(), StageFailure> {
    match outcome {
        StageOutcome::Success => Ok(()),
        StageOutcome::Failure(f) if f.recoverable => {
            reporter.warn(&format!("{f} (continuing)"));
            Ok(())
        }
        StageOutcome::Failure(f) => Err(f),
    }
}
