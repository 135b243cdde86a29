//! `campusctl deploy` — build images, apply manifests, report the endpoint.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::{finish, require_env};

/// Run `campusctl deploy`.
///
/// # Errors
///
/// Returns an error if a required environment variable is missing.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    require_env(app)?;
    let reporter = app.reporter();
    app.output.info("Deploying...");
    let outcome = app.orchestrator(&reporter).deploy().await;
    finish(app, &outcome)
}
