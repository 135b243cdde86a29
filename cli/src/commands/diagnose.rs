//! `campusctl diagnose <selector>` — show logs of not-ready pods.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::commands::print_diagnostics;
use crate::domain::config::is_valid_selector;
use crate::output::json;

/// Arguments for the diagnose command.
#[derive(Args)]
pub struct DiagnoseArgs {
    /// Label selector, e.g. `app=backend`
    pub selector: String,
}

/// Run `campusctl diagnose`.
///
/// Exits 1 when any matching pod is not ready.
///
/// # Errors
///
/// Returns an error if the selector is malformed or the pods cannot be
/// listed.
pub async fn run(app: &AppContext, args: &DiagnoseArgs) -> Result<ExitCode> {
    anyhow::ensure!(
        is_valid_selector(&args.selector),
        "invalid label selector '{}'",
        args.selector
    );
    let reporter = app.reporter();
    let diagnostics = app
        .orchestrator(&reporter)
        .inspect_pods(&args.selector)
        .await?;

    if app.is_json() {
        json::print(&serde_json::json!({
            "selector": args.selector,
            "diagnostics": diagnostics,
        }))?;
    } else if diagnostics.is_empty() {
        app.output
            .success(&format!("no unready pods match {}", args.selector));
    } else {
        print_diagnostics(&app.output, &diagnostics);
    }

    Ok(if diagnostics.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
