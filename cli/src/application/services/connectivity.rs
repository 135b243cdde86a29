//! Inter-component connectivity check run as a one-shot cluster job.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::time::Duration;

use serde::Serialize;

use crate::application::ports::{JobRunner, ManifestApplier, ProgressReporter};
use crate::application::services::stage::check;
use crate::domain::config::DeployConfig;
use crate::domain::outcome::{Stage, StageFailure};

/// What the connectivity job reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectivityReport {
    /// `true` if the job reached `complete` before the timeout.
    pub completed: bool,
    /// Job log output, when it could be fetched.
    pub log: Option<String>,
}

/// Run the connectivity job and capture its output.
///
/// A leftover job from an interrupted run is removed first. Applying the
/// job manifest is fatal on failure; a wait that times out, a log fetch and
/// the final job deletion are best-effort and only reported.
///
/// # Errors
///
/// Returns a [`StageFailure`] if the job manifest cannot be applied.
pub async fn check_connectivity(
    cluster: &(impl ManifestApplier + JobRunner),
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
) -> Result<ConnectivityReport, StageFailure> {
    let job = &config.connectivity.job;
    let timeout = Duration::from_secs(config.connectivity.timeout_secs);

    delete_job(cluster, reporter, job).await;

    reporter.step(&format!("running connectivity job {job}..."));
    check(
        Stage::Connectivity,
        cluster.apply(&config.manifests.connectivity_job).await,
    )?;

    let completed = match check(Stage::Connectivity, cluster.wait_complete(job, timeout).await) {
        Ok(_) => {
            reporter.success(&format!("connectivity job {job} completed"));
            true
        }
        Err(failure) => {
            reporter.warn(&format!(
                "connectivity job {job} did not complete within {}s: {}",
                timeout.as_secs(),
                failure.reason
            ));
            false
        }
    };

    let log = match check(Stage::Connectivity, cluster.job_logs(job).await) {
        Ok(exec) => Some(exec.stdout_text()),
        Err(failure) => {
            reporter.warn(&format!("could not fetch logs for job {job}: {}", failure.reason));
            None
        }
    };

    delete_job(cluster, reporter, job).await;

    Ok(ConnectivityReport { completed, log })
}

async fn delete_job(cluster: &impl JobRunner, reporter: &impl ProgressReporter, job: &str) {
    if let Err(failure) = check(Stage::Connectivity, cluster.delete_job(job).await) {
        reporter.warn(&format!("could not delete job {job}: {}", failure.reason));
    }
}
