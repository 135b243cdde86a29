//! Command implementations

pub mod deploy;
pub mod diagnose;
pub mod endpoint;
pub mod pause;
pub mod reset;
pub mod resume;
pub mod version;

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::lifecycle::LifecycleOutcome;
use crate::domain::config::check_required_env;
use crate::domain::outcome::Diagnostic;
use crate::output::{OutputContext, json};

/// Fail unless every configured environment variable is set and non-empty.
///
/// # Errors
///
/// Returns a `PreconditionError` naming every missing variable.
pub fn require_env(app: &AppContext) -> Result<()> {
    check_required_env(&app.config.required_env, |name| std::env::var(name).ok())?;
    Ok(())
}

/// Render a lifecycle outcome and map it to the process exit code.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn finish(app: &AppContext, outcome: &LifecycleOutcome) -> Result<ExitCode> {
    if app.is_json() {
        let doc = match outcome {
            LifecycleOutcome::Completed(report) => serde_json::json!({
                "status": "completed",
                "endpoint": report.endpoint,
                "connectivity": report.connectivity,
            }),
            LifecycleOutcome::Aborted(failure) => serde_json::json!({
                "status": "aborted",
                "failure": failure,
            }),
        };
        json::print(&doc)?;
    } else {
        let ctx = &app.output;
        match outcome {
            LifecycleOutcome::Completed(report) => {
                if let Some(log) = report.connectivity.as_ref().and_then(|c| c.log.as_ref()) {
                    ctx.header("Connectivity check output");
                    ctx.quote(log);
                }
            }
            LifecycleOutcome::Aborted(failure) => {
                ctx.error(&failure.to_string());
                print_diagnostics(ctx, &failure.diagnostics);
            }
        }
    }

    Ok(match outcome {
        LifecycleOutcome::Completed(_) => ExitCode::SUCCESS,
        LifecycleOutcome::Aborted(failure) => ExitCode::from(failure.process_exit_code()),
    })
}

/// Print each not-ready pod and its logs to stderr.
pub fn print_diagnostics(ctx: &OutputContext, diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        ctx.error(&format!("pod {} is not ready; logs:", diag.instance));
        ctx.log_block(&diag.log);
    }
}
