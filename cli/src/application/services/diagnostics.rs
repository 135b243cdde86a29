//! Failure diagnostics: logs of not-ready pods behind a label selector.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, ResourceInspector};
use crate::domain::cluster::{PodList, decode};
use crate::domain::outcome::Diagnostic;

/// Collect logs from every not-ready pod matching `selector`.
///
/// Never fails: if the pods cannot be listed or decoded, a warning is
/// reported and the result is empty. A failed log fetch is reported and
/// recorded as that pod's diagnostic text.
pub async fn collect_failure_diagnostics(
    cluster: &impl ResourceInspector,
    reporter: &impl ProgressReporter,
    selector: &str,
) -> Vec<Diagnostic> {
    match inspect_pods(cluster, reporter, selector).await {
        Ok(diagnostics) => diagnostics,
        Err(e) => {
            reporter.warn(&format!("could not collect diagnostics for {selector}: {e:#}"));
            Vec::new()
        }
    }
}

/// Collect logs from every not-ready pod matching `selector`, failing when
/// the pods cannot be listed or decoded.
///
/// # Errors
///
/// Returns an error if the pod query fails, exits non-zero, or its output
/// is not a valid pod list.
pub async fn inspect_pods(
    cluster: &impl ResourceInspector,
    reporter: &impl ProgressReporter,
    selector: &str,
) -> Result<Vec<Diagnostic>> {
    let exec = cluster
        .pods(selector)
        .await
        .with_context(|| format!("listing pods for {selector}"))?;
    anyhow::ensure!(exec.success(), "{}", exec.failure_reason());
    let pods: PodList = decode(&exec.stdout, "pod list")?;

    let mut diagnostics = Vec::new();
    for pod in pods.items.iter().filter(|p| !p.is_ready()) {
        let name = pod.name();
        reporter.step(&format!("pod {name} is not ready, fetching logs..."));
        let log = match cluster.pod_logs(name).await {
            Ok(logs) if logs.success() => logs.stdout_text(),
            Ok(logs) => {
                let reason = logs.failure_reason();
                reporter.warn(&format!("could not fetch logs for {name}: {reason}"));
                reason
            }
            Err(e) => {
                let reason = format!("{e:#}");
                reporter.warn(&format!("could not fetch logs for {name}: {reason}"));
                reason
            }
        };
        diagnostics.push(Diagnostic {
            instance: name.to_string(),
            log,
        });
    }
    Ok(diagnostics)
}
