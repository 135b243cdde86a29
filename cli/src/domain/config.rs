//! Domain types and validators for deployment configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::{ConfigError, PreconditionError};

// ── Constants ────────────────────────────────────────────────────────────────

/// Variables the deployed services read at startup.
pub const DEFAULT_REQUIRED_ENV: &[&str] = &[
    "NODE_ENV",
    "PORT",
    "MONGO_URI",
    "REDIS_HOST",
    "REDIS_PORT",
    "SESSION_SECRET",
];

/// Upper bound for `connectivity.timeout_secs` (one day).
pub const MAX_CONNECTIVITY_TIMEOUT_SECS: u64 = 86_400;

static SELECTOR_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9._/-]*[A-Za-z0-9])?=[A-Za-z0-9._-]*$").ok());

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `campusctl.yaml`.
///
/// Read once per invocation and immutable for the rest of the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeployConfig {
    pub backend: WorkloadConfig,
    pub gateway: WorkloadConfig,
    pub manifests: ManifestConfig,
    /// Service exposing the gateway through a node port.
    pub service: String,
    pub cluster: ClusterConfig,
    pub connectivity: ConnectivityConfig,
    pub test_suite: TestSuiteConfig,
    pub required_env: Vec<String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            backend: WorkloadConfig {
                deployment: "backend".to_string(),
                image: "campusconnect-backend".to_string(),
                tag: default_tag(),
                context: "backend".to_string(),
                dockerfile: None,
                selector: "app=backend".to_string(),
            },
            gateway: WorkloadConfig {
                deployment: "nginx".to_string(),
                image: "campusconnect-nginx".to_string(),
                tag: default_tag(),
                // Built from the repository root: the gateway image copies
                // the frontend build output from a sibling directory.
                context: ".".to_string(),
                dockerfile: Some("nginx/Dockerfile".to_string()),
                selector: "app=nginx".to_string(),
            },
            manifests: ManifestConfig::default(),
            service: "myapp-nginx".to_string(),
            cluster: ClusterConfig::default(),
            connectivity: ConnectivityConfig::default(),
            test_suite: TestSuiteConfig::default(),
            required_env: DEFAULT_REQUIRED_ENV.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// One deployable workload: its deployment, image and label selector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkloadConfig {
    pub deployment: String,
    pub image: String,
    #[serde(default = "default_tag")]
    pub tag: String,
    pub context: String,
    #[serde(default)]
    pub dockerfile: Option<String>,
    pub selector: String,
}

impl WorkloadConfig {
    /// Image reference in `name:tag` form.
    #[must_use]
    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }
}

fn default_tag() -> String {
    "latest".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ManifestConfig {
    /// Applied first; failure is recoverable.
    pub config_manifest: String,
    /// Applied as a whole after the config manifest.
    pub directory: String,
    /// Job used by the connectivity check. Keep it outside `directory`.
    pub connectivity_job: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            config_manifest: "k8s/configmap.yaml".to_string(),
            directory: "k8s/".to_string(),
            connectivity_job: "k8s/jobs/connectivity-test.yaml".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClusterConfig {
    /// Control-plane CLI program.
    pub kubectl: String,
    /// Image builder program.
    pub docker: String,
    pub context: Option<String>,
    pub namespace: Option<String>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            kubectl: "kubectl".to_string(),
            docker: "docker".to_string(),
            context: None,
            namespace: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// Name of the job created by `manifests.connectivity_job`.
    pub job: String,
    pub timeout_secs: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            job: "connectivity-test".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TestSuiteConfig {
    pub command: Vec<String>,
    pub dir: Option<String>,
}

impl Default for TestSuiteConfig {
    fn default() -> Self {
        Self {
            command: vec!["npm".to_string(), "test".to_string()],
            dir: Some("backend".to_string()),
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Returns `true` if `selector` has the `key=value` shape.
#[must_use]
pub fn is_valid_selector(selector: &str) -> bool {
    SELECTOR_RE.as_ref().is_some_and(|re| re.is_match(selector))
}

impl DeployConfig {
    /// Validate names, selectors and the test command.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<()> {
        for (prefix, w) in [("backend", &self.backend), ("gateway", &self.gateway)] {
            non_empty(&format!("{prefix}.deployment"), &w.deployment)?;
            non_empty(&format!("{prefix}.image"), &w.image)?;
            non_empty(&format!("{prefix}.tag"), &w.tag)?;
            non_empty(&format!("{prefix}.context"), &w.context)?;
            if !is_valid_selector(&w.selector) {
                return Err(ConfigError::InvalidSelector {
                    key: format!("{prefix}.selector"),
                    value: w.selector.clone(),
                }
                .into());
            }
        }
        non_empty("service", &self.service)?;
        non_empty("manifests.config_manifest", &self.manifests.config_manifest)?;
        non_empty("manifests.directory", &self.manifests.directory)?;
        non_empty("manifests.connectivity_job", &self.manifests.connectivity_job)?;
        non_empty("connectivity.job", &self.connectivity.job)?;
        let timeout = self.connectivity.timeout_secs;
        if !(1..=MAX_CONNECTIVITY_TIMEOUT_SECS).contains(&timeout) {
            return Err(ConfigError::OutOfRange {
                key: "connectivity.timeout_secs".to_string(),
                value: timeout,
                max: MAX_CONNECTIVITY_TIMEOUT_SECS,
            }
            .into());
        }
        non_empty("cluster.kubectl", &self.cluster.kubectl)?;
        non_empty("cluster.docker", &self.cluster.docker)?;
        match self.test_suite.command.first() {
            Some(program) if !program.is_empty() => Ok(()),
            _ => Err(ConfigError::Empty {
                key: "test_suite.command".to_string(),
            }
            .into()),
        }
    }
}

fn non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty {
            key: key.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Names from `required` whose value is unset or empty according to `lookup`.
#[must_use]
pub fn missing_env(required: &[String], lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    required
        .iter()
        .filter(|name| lookup(name).is_none_or(|v| v.is_empty()))
        .cloned()
        .collect()
}

/// Fail with [`PreconditionError::MissingEnv`] if any required variable is absent.
///
/// # Errors
///
/// Returns an error listing every missing variable.
pub fn check_required_env(
    required: &[String],
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), PreconditionError> {
    let missing = missing_env(required, lookup);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PreconditionError::MissingEnv(missing))
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
