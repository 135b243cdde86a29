//! Lifecycle commands composed from the workflow stages.
//!
//! `Orchestrator` is built once per invocation. It owns nothing mutable:
//! the configuration is read-only and every collaborator is injected, so
//! tests substitute fakes for the builder, the control-plane and the
//! command runner.

use std::path::Path;

use serde::Serialize;

use crate::application::ports::{
    CommandRunner, ControlPlane, Execution, ImageBuilder, ProgressReporter, command_line,
};
use crate::application::services::connectivity::{ConnectivityReport, check_connectivity};
use crate::application::services::stage::check;
use crate::application::services::{apply, build, diagnostics, endpoint};
use crate::domain::cluster::ServiceEndpoint;
use crate::domain::config::DeployConfig;
use crate::domain::outcome::{Diagnostic, Stage, StageFailure, StageOutcome};

/// What a completed lifecycle command produced.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub endpoint: Option<ServiceEndpoint>,
    pub connectivity: Option<ConnectivityReport>,
}

/// Result of a lifecycle command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// Every stage ran; best-effort failures were reported as warnings.
    Completed(Report),
    /// A fatal stage failure halted the command.
    Aborted(StageFailure),
}

impl From<Result<Report, StageFailure>> for LifecycleOutcome {
    fn from(res: Result<Report, StageFailure>) -> Self {
        match res {
            Ok(report) => Self::Completed(report),
            Err(failure) => Self::Aborted(failure),
        }
    }
}

/// Drives the builder and control-plane through the lifecycle commands.
pub struct Orchestrator<'a, B, C, R, P> {
    config: &'a DeployConfig,
    builder: &'a B,
    cluster: &'a C,
    runner: &'a R,
    reporter: &'a P,
}

impl<'a, B, C, R, P> Orchestrator<'a, B, C, R, P>
where
    B: ImageBuilder,
    C: ControlPlane,
    R: CommandRunner,
    P: ProgressReporter,
{
    pub fn new(
        config: &'a DeployConfig,
        builder: &'a B,
        cluster: &'a C,
        runner: &'a R,
        reporter: &'a P,
    ) -> Self {
        Self {
            config,
            builder,
            cluster,
            runner,
            reporter,
        }
    }

    // ── Stages ───────────────────────────────────────────────────────────────

    pub async fn build_images(&self) -> StageOutcome {
        build::build_images(self.builder, self.cluster, self.reporter, self.config).await
    }

    pub async fn deploy_manifests(&self) -> StageOutcome {
        apply::deploy_manifests(self.cluster, self.reporter, self.config).await
    }

    /// Resolve the endpoint without reporting.
    ///
    /// # Errors
    ///
    /// Returns an error if the service or node query fails.
    pub async fn resolve_endpoint(&self) -> anyhow::Result<Option<ServiceEndpoint>> {
        endpoint::resolve_endpoint(self.cluster, &self.config.service).await
    }

    pub async fn collect_failure_diagnostics(&self, selector: &str) -> Vec<Diagnostic> {
        diagnostics::collect_failure_diagnostics(self.cluster, self.reporter, selector).await
    }

    /// Diagnostics for an on-demand check, where an unreachable
    /// control-plane must not read as "all pods ready".
    ///
    /// # Errors
    ///
    /// Returns an error if the pods cannot be listed or decoded.
    pub async fn inspect_pods(&self, selector: &str) -> anyhow::Result<Vec<Diagnostic>> {
        diagnostics::inspect_pods(self.cluster, self.reporter, selector).await
    }

    /// Run the backend test suite with the terminal attached.
    pub async fn run_test_suite(&self) -> StageOutcome {
        let suite = &self.config.test_suite;
        let Some((program, rest)) = suite.command.split_first() else {
            return StageOutcome::Failure(StageFailure::fatal(
                Stage::TestSuite,
                "no test command configured",
                None,
            ));
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let command = command_line(program, &args);
        self.reporter.step(&format!("running {command}..."));

        let res = self
            .runner
            .run_status(program, &args, suite.dir.as_deref().map(Path::new))
            .await
            .map(|status| Execution::inherited(command, status));

        match check(Stage::TestSuite, res) {
            Ok(_) => {
                self.reporter.success("test suite passed");
                StageOutcome::Success
            }
            Err(failure) => {
                let diagnostics = self
                    .collect_failure_diagnostics(&self.config.backend.selector)
                    .await;
                StageOutcome::Failure(failure.with_diagnostics(diagnostics))
            }
        }
    }

    /// Run the connectivity job.
    ///
    /// # Errors
    ///
    /// Returns a [`StageFailure`] if the job manifest cannot be applied.
    pub async fn check_connectivity(&self) -> Result<ConnectivityReport, StageFailure> {
        check_connectivity(self.cluster, self.reporter, self.config).await
    }

    /// Resolve the endpoint and report it; failures are logged, not raised.
    async fn report_endpoint(&self) -> Option<ServiceEndpoint> {
        match self.resolve_endpoint().await {
            Ok(Some(ep)) => {
                self.reporter.success(&format!("application reachable at {ep}"));
                Some(ep)
            }
            Ok(None) => {
                self.reporter.error(
                    "no node reports an ExternalIP or InternalIP address; endpoint unavailable",
                );
                None
            }
            Err(e) => {
                self.reporter
                    .error(&format!("could not resolve application endpoint: {e:#}"));
                None
            }
        }
    }

    // ── Lifecycle commands ───────────────────────────────────────────────────

    /// build images → apply manifests → resolve endpoint.
    pub async fn deploy(&self) -> LifecycleOutcome {
        async {
            self.build_images().await.into_result()?;
            self.deploy_manifests().await.into_result()?;
            Ok::<_, StageFailure>(Report {
                endpoint: self.report_endpoint().await,
                connectivity: None,
            })
        }
        .await
        .into()
    }

    /// build images → apply manifests → test suite → connectivity job →
    /// resolve endpoint.
    pub async fn deploy_and_test(&self) -> LifecycleOutcome {
        async {
            self.build_images().await.into_result()?;
            self.deploy_manifests().await.into_result()?;
            self.run_test_suite().await.into_result()?;
            let connectivity = self.check_connectivity().await?;
            Ok::<_, StageFailure>(Report {
                endpoint: self.report_endpoint().await,
                connectivity: Some(connectivity),
            })
        }
        .await
        .into()
    }

    /// Delete every applied manifest. Always completes; a failed delete is
    /// only reported.
    pub async fn reset(&self) -> LifecycleOutcome {
        let dir = &self.config.manifests.directory;
        self.reporter.step(&format!("deleting resources from {dir}..."));
        match check(Stage::Reset, self.cluster.delete(dir).await) {
            Ok(_) => self.reporter.success("resources deleted"),
            Err(failure) => self.reporter.warn(&format!("{failure} (ignored)")),
        }
        LifecycleOutcome::Completed(Report::default())
    }

    /// Scale backend and gateway to zero replicas.
    pub async fn pause(&self) -> LifecycleOutcome {
        self.scale_all(0).await
    }

    /// Scale backend and gateway to one replica each.
    pub async fn resume(&self) -> LifecycleOutcome {
        self.scale_all(1).await
    }

    async fn scale_all(&self, replicas: u32) -> LifecycleOutcome {
        async {
            for workload in [&self.config.backend, &self.config.gateway] {
                let name = &workload.deployment;
                self.reporter
                    .step(&format!("scaling {name} to {replicas} replica(s)..."));
                check(Stage::Scale, self.cluster.scale(name, replicas).await)?;
                self.reporter.success(&format!("{name} scaled to {replicas}"));
            }
            Ok::<_, StageFailure>(Report::default())
        }
        .await
        .into()
    }
}
