//! `campusctl pause` — scale the workloads to zero.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::finish;

/// Run `campusctl pause`.
///
/// # Errors
///
/// Returns an error if JSON output cannot be written.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let reporter = app.reporter();
    let outcome = app.orchestrator(&reporter).pause().await;
    finish(app, &outcome)
}
