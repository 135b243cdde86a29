//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Result of one external command, tagged with the command line that ran.
#[derive(Debug)]
pub struct Execution {
    /// Rendered command line, e.g. `kubectl apply -f k8s/`.
    pub command: String,
    pub status: ExitStatus,
    /// Captured stdout; empty when the command inherited the terminal.
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Execution {
    /// Build from captured process output.
    #[must_use]
    pub fn captured(command: String, output: Output) -> Self {
        Self {
            command,
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }

    /// Build from a command that inherited the terminal's stdio.
    #[must_use]
    pub fn inherited(command: String, status: ExitStatus) -> Self {
        Self {
            command,
            status,
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }

    #[must_use]
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    #[must_use]
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// `"<command>" exited with <code>` plus trimmed stderr when present.
    #[must_use]
    pub fn failure_reason(&self) -> String {
        let code = self
            .code()
            .map_or_else(|| "a signal".to_string(), |c| c.to_string());
        let stderr = String::from_utf8_lossy(&self.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            format!("`{}` exited with {code}", self.command)
        } else {
            format!("`{}` exited with {code}: {stderr}", self.command)
        }
    }
}

/// Render a program and its arguments as a single command line.
#[must_use]
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build parameters for one container image.
pub struct ImageSpec<'a> {
    /// Image reference in `name:tag` form.
    pub image: &'a str,
    /// Build context directory.
    pub context: &'a str,
    /// Dockerfile path when it does not live at `<context>/Dockerfile`.
    pub dockerfile: Option<&'a str>,
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Implementations never retry.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program, killing it if it outlives `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<ExitStatus>;
}

// ── Builder Port ──────────────────────────────────────────────────────────────

/// External container image builder.
#[allow(async_fn_in_trait)]
pub trait ImageBuilder {
    /// Build one image without using the layer cache.
    async fn build(&self, spec: &ImageSpec<'_>) -> Result<Execution>;
}

// ── Control-plane Port Traits ─────────────────────────────────────────────────

/// Manifest application and removal.
#[allow(async_fn_in_trait)]
pub trait ManifestApplier {
    /// Apply a manifest file or directory.
    async fn apply(&self, path: &str) -> Result<Execution>;
    /// Delete the resources described by a manifest file or directory,
    /// ignoring resources that are already gone.
    async fn delete(&self, path: &str) -> Result<Execution>;
}

/// Rollout convergence queries.
#[allow(async_fn_in_trait)]
pub trait RolloutWatcher {
    /// Block until the deployment's rollout converges or the control-plane
    /// reports failure.
    async fn rollout_status(&self, deployment: &str) -> Result<Execution>;
}

/// Read-only resource queries. Outputs are JSON documents.
#[allow(async_fn_in_trait)]
pub trait ResourceInspector {
    /// List pods matching a label selector.
    async fn pods(&self, selector: &str) -> Result<Execution>;
    /// Fetch a single service.
    async fn service(&self, name: &str) -> Result<Execution>;
    /// List all nodes.
    async fn nodes(&self) -> Result<Execution>;
    /// Fetch a pod's logs as text.
    async fn pod_logs(&self, pod: &str) -> Result<Execution>;
}

/// Deployment scaling.
#[allow(async_fn_in_trait)]
pub trait WorkloadScaler {
    /// Set the desired replica count of a deployment.
    async fn scale(&self, deployment: &str, replicas: u32) -> Result<Execution>;
}

/// One-shot job supervision.
#[allow(async_fn_in_trait)]
pub trait JobRunner {
    /// Block until the job reports `complete` or `timeout` elapses.
    async fn wait_complete(&self, job: &str, timeout: Duration) -> Result<Execution>;
    /// Fetch the job's log output.
    async fn job_logs(&self, job: &str) -> Result<Execution>;
    /// Delete the job, ignoring a job that is already gone.
    async fn delete_job(&self, job: &str) -> Result<Execution>;
}

/// Composite trait — any type implementing all sub-traits is a `ControlPlane`.
pub trait ControlPlane:
    ManifestApplier + RolloutWatcher + ResourceInspector + WorkloadScaler + JobRunner
{
}

/// Blanket implementation: any type implementing all sub-traits is a `ControlPlane`.
impl<T> ControlPlane for T where
    T: ManifestApplier + RolloutWatcher + ResourceInspector + WorkloadScaler + JobRunner
{
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an error that does not abort the workflow.
    fn error(&self, message: &str);
}
