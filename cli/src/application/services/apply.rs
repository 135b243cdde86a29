//! Manifest apply stage: config manifest, manifest directory, rollouts.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::{
    Execution, ManifestApplier, ProgressReporter, ResourceInspector, RolloutWatcher,
};
use crate::application::services::diagnostics::collect_failure_diagnostics;
use crate::application::services::stage::{check, proceed};
use crate::domain::config::{DeployConfig, WorkloadConfig};
use crate::domain::outcome::{RolloutStatus, Stage, StageFailure, StageOutcome};

/// Apply manifests and wait for both deployments to converge.
///
/// 1. The config manifest is applied; its failure is recoverable.
/// 2. The manifest directory is applied; its failure is fatal.
/// 3. Backend, then gateway, rollouts are awaited; the first that does not
///    converge is fatal and skips the rest.
pub async fn deploy_manifests(
    cluster: &(impl ManifestApplier + RolloutWatcher + ResourceInspector),
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
) -> StageOutcome {
    deploy(cluster, reporter, config).await.into()
}

async fn deploy(
    cluster: &(impl ManifestApplier + RolloutWatcher + ResourceInspector),
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
) -> Result<(), StageFailure> {
    let manifests = &config.manifests;

    reporter.step(&format!("applying {}...", manifests.config_manifest));
    proceed(apply_config(cluster, &manifests.config_manifest).await, reporter)?;

    reporter.step(&format!("applying {}...", manifests.directory));
    if let Err(failure) = check(Stage::ManifestApply, cluster.apply(&manifests.directory).await) {
        let diagnostics =
            collect_failure_diagnostics(cluster, reporter, &config.backend.selector).await;
        return Err(failure.with_diagnostics(diagnostics));
    }
    reporter.success("manifests applied");

    for workload in [&config.backend, &config.gateway] {
        await_rollout(cluster, reporter, workload).await?;
    }
    Ok(())
}

/// Apply the config manifest. Any failure is returned as recoverable:
/// the resource commonly exists already from an earlier run.
pub async fn apply_config(cluster: &impl ManifestApplier, path: &str) -> StageOutcome {
    match check(Stage::ConfigApply, cluster.apply(path).await) {
        Ok(_) => StageOutcome::Success,
        Err(failure) => StageOutcome::Failure(StageFailure {
            recoverable: true,
            ..failure
        }),
    }
}

/// Map a finished `rollout status` query to a rollout state.
///
/// A watch killed by a signal never saw the rollout finish, so it stays
/// `Pending`.
#[must_use]
pub fn rollout_state(exec: &Execution) -> RolloutStatus {
    match exec.code() {
        Some(0) => RolloutStatus::Converged,
        Some(_) => RolloutStatus::Failed,
        None => RolloutStatus::Pending,
    }
}

async fn await_rollout(
    cluster: &(impl RolloutWatcher + ResourceInspector),
    reporter: &impl ProgressReporter,
    workload: &WorkloadConfig,
) -> Result<(), StageFailure> {
    let name = &workload.deployment;
    reporter.step(&format!("waiting for rollout of {name}..."));

    let failure = match cluster.rollout_status(name).await {
        Ok(exec) => match rollout_state(&exec) {
            RolloutStatus::Converged => {
                reporter.success(&format!("{name} rolled out"));
                return Ok(());
            }
            RolloutStatus::Failed => {
                StageFailure::fatal(Stage::Rollout, exec.failure_reason(), exec.code())
            }
            RolloutStatus::Pending => StageFailure::fatal(
                Stage::Rollout,
                format!("rollout of {name} did not finish: {}", exec.failure_reason()),
                None,
            ),
        },
        Err(e) => StageFailure::fatal(Stage::Rollout, format!("{e:#}"), None),
    };

    let diagnostics = collect_failure_diagnostics(cluster, reporter, &workload.selector).await;
    Err(failure.with_diagnostics(diagnostics))
}
