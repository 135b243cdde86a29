//! `campusctl resume` — scale the workloads back to one replica.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::lifecycle::LifecycleOutcome;
use crate::commands::finish;

/// Run `campusctl resume`.
///
/// # Errors
///
/// Returns an error if JSON output cannot be written.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let reporter = app.reporter();
    let outcome = app.orchestrator(&reporter).resume().await;
    if matches!(outcome, LifecycleOutcome::Completed(_)) {
        app.output.info("Endpoint: campusctl endpoint");
    }
    finish(app, &outcome)
}
