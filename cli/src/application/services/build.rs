//! Image build stage.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::{ImageBuilder, ImageSpec, ProgressReporter, ResourceInspector};
use crate::application::services::diagnostics::collect_failure_diagnostics;
use crate::application::services::stage::check;
use crate::domain::config::{DeployConfig, WorkloadConfig};
use crate::domain::outcome::{Stage, StageFailure, StageOutcome};

/// Build the backend image, then the gateway image.
///
/// Builds run sequentially and stop at the first failure; the gateway is
/// never built after a failed backend build. Diagnostics on failure are
/// collected for the backend selector.
pub async fn build_images(
    builder: &impl ImageBuilder,
    cluster: &impl ResourceInspector,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
) -> StageOutcome {
    for workload in [&config.backend, &config.gateway] {
        if let Err(failure) = build_one(builder, reporter, workload).await {
            let diagnostics =
                collect_failure_diagnostics(cluster, reporter, &config.backend.selector).await;
            return StageOutcome::Failure(failure.with_diagnostics(diagnostics));
        }
    }
    StageOutcome::Success
}

async fn build_one(
    builder: &impl ImageBuilder,
    reporter: &impl ProgressReporter,
    workload: &WorkloadConfig,
) -> Result<(), StageFailure> {
    let image = workload.image_ref();
    reporter.step(&format!("building {image}..."));
    let spec = ImageSpec {
        image: &image,
        context: &workload.context,
        dockerfile: workload.dockerfile.as_deref(),
    };
    check(Stage::Build, builder.build(&spec).await)?;
    reporter.success(&format!("built {image}"));
    Ok(())
}
