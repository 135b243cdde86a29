//! `campusctl endpoint` — print where the application is reachable.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::output::json;

/// Run `campusctl endpoint`.
///
/// Exits 1 when no node publishes a usable address.
///
/// # Errors
///
/// Returns an error if the service or node query fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let reporter = app.reporter();
    let endpoint = app.orchestrator(&reporter).resolve_endpoint().await?;

    if app.is_json() {
        json::print(&serde_json::json!({ "endpoint": endpoint }))?;
    } else {
        match &endpoint {
            Some(ep) if app.output.quiet => println!("{ep}"),
            Some(ep) => app.output.success(&format!("application accessible at {ep}")),
            None => app
                .output
                .error("no node reports an ExternalIP or InternalIP address"),
        }
    }

    Ok(if endpoint.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
