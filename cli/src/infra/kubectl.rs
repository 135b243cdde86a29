//! Infrastructure implementation of the control-plane port traits.
//!
//! `KubectlControlPlane<R>` routes every control-plane call through a
//! `CommandRunner` invoking `kubectl`, prefixing the configured
//! `--context` / `--namespace` flags.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, Execution, JobRunner, ManifestApplier, ResourceInspector, RolloutWatcher,
    WorkloadScaler, command_line,
};
use crate::domain::config::ClusterConfig;

/// Extra time allowed past `kubectl wait --timeout` before the child is killed.
const WAIT_GRACE: Duration = Duration::from_secs(30);

/// Infrastructure adapter that drives the cluster through `kubectl`.
///
/// Generic over `R: CommandRunner` so that tests can inject a recording
/// runner without spawning real processes.
pub struct KubectlControlPlane<R: CommandRunner> {
    runner: R,
    program: String,
    global_args: Vec<String>,
}

impl<R: CommandRunner> KubectlControlPlane<R> {
    pub fn new(runner: R, cluster: &ClusterConfig) -> Self {
        let mut global_args = Vec::new();
        if let Some(context) = &cluster.context {
            global_args.push(format!("--context={context}"));
        }
        if let Some(namespace) = &cluster.namespace {
            global_args.push(format!("--namespace={namespace}"));
        }
        Self {
            runner,
            program: cluster.kubectl.clone(),
            global_args,
        }
    }

    fn full_args<'s>(&'s self, args: &[&'s str]) -> Vec<&'s str> {
        self.global_args
            .iter()
            .map(String::as_str)
            .chain(args.iter().copied())
            .collect()
    }

    async fn kubectl(&self, args: &[&str]) -> Result<Execution> {
        let full = self.full_args(args);
        let output = self
            .runner
            .run(&self.program, &full)
            .await
            .with_context(|| format!("kubectl {}", args.first().copied().unwrap_or_default()))?;
        Ok(Execution::captured(command_line(&self.program, &full), output))
    }
}

impl<R: CommandRunner> ManifestApplier for KubectlControlPlane<R> {
    async fn apply(&self, path: &str) -> Result<Execution> {
        self.kubectl(&["apply", "-f", path]).await
    }

    async fn delete(&self, path: &str) -> Result<Execution> {
        self.kubectl(&["delete", "-f", path, "--ignore-not-found"]).await
    }
}

impl<R: CommandRunner> RolloutWatcher for KubectlControlPlane<R> {
    async fn rollout_status(&self, deployment: &str) -> Result<Execution> {
        let target = format!("deployment/{deployment}");
        self.kubectl(&["rollout", "status", &target]).await
    }
}

impl<R: CommandRunner> ResourceInspector for KubectlControlPlane<R> {
    async fn pods(&self, selector: &str) -> Result<Execution> {
        self.kubectl(&["get", "pods", "-l", selector, "-o", "json"]).await
    }

    async fn service(&self, name: &str) -> Result<Execution> {
        self.kubectl(&["get", "svc", name, "-o", "json"]).await
    }

    async fn nodes(&self) -> Result<Execution> {
        self.kubectl(&["get", "nodes", "-o", "json"]).await
    }

    async fn pod_logs(&self, pod: &str) -> Result<Execution> {
        self.kubectl(&["logs", pod]).await
    }
}

impl<R: CommandRunner> WorkloadScaler for KubectlControlPlane<R> {
    async fn scale(&self, deployment: &str, replicas: u32) -> Result<Execution> {
        let target = format!("deployment/{deployment}");
        let replicas = format!("--replicas={replicas}");
        self.kubectl(&["scale", &target, &replicas]).await
    }
}

impl<R: CommandRunner> JobRunner for KubectlControlPlane<R> {
    async fn wait_complete(&self, job: &str, timeout: Duration) -> Result<Execution> {
        let target = format!("job/{job}");
        let timeout_arg = format!("--timeout={}s", timeout.as_secs());
        let args = ["wait", "--for=condition=complete", &target, &timeout_arg];
        let full = self.full_args(&args);
        let output = self
            .runner
            .run_with_timeout(&self.program, &full, timeout.saturating_add(WAIT_GRACE))
            .await
            .context("kubectl wait")?;
        Ok(Execution::captured(command_line(&self.program, &full), output))
    }

    async fn job_logs(&self, job: &str) -> Result<Execution> {
        let target = format!("job/{job}");
        self.kubectl(&["logs", &target]).await
    }

    async fn delete_job(&self, job: &str) -> Result<Execution> {
        self.kubectl(&["delete", "job", job, "--ignore-not-found"]).await
    }
}
