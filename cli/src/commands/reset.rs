//! `campusctl reset` — delete every applied resource.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::finish;

/// Run `campusctl reset`.
///
/// # Errors
///
/// Returns an error if the confirmation prompt fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let dir = &app.config.manifests.directory;
    if !app.confirm(&format!("Delete every resource defined in {dir}?"), true)? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }
    let reporter = app.reporter();
    let outcome = app.orchestrator(&reporter).reset().await;
    finish(app, &outcome)
}
