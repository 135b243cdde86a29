//! Application context — unified state passed to every command handler.
//!
//! `AppContext` bundles the output context, the loaded deployment
//! configuration, and the production adapters (docker, kubectl, process
//! runner) so command handlers only wire them into an `Orchestrator`.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::services::lifecycle::Orchestrator;
use crate::domain::config::DeployConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::docker::DockerImageBuilder;
use crate::infra::kubectl::KubectlControlPlane;
use crate::output::{OutputContext, TerminalReporter};

/// Environment variable that, when set, skips interactive prompts.
pub const YES_ENV: &str = "CAMPUSCTL_YES";

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `CAMPUSCTL_YES` env vars).
    pub yes: bool,
    /// Explicit configuration file.
    pub config: Option<PathBuf>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Validated deployment configuration.
    pub config: DeployConfig,
    /// Image builder driving the docker CLI.
    pub builder: DockerImageBuilder<TokioCommandRunner>,
    /// Control-plane adapter driving kubectl.
    pub cluster: KubectlControlPlane<TokioCommandRunner>,
    /// Runner for the backend test suite.
    pub runner: TokioCommandRunner,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `CAMPUSCTL_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or is invalid.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var(YES_ENV).is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config = YamlConfigStore::new(flags.behaviour.config.clone()).load()?;
        let runner = if flags.output.json {
            TokioCommandRunner::diverting_stdout()
        } else {
            TokioCommandRunner::default()
        };

        Ok(Self {
            // JSON mode keeps stdout for the document alone.
            output: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet || flags.output.json,
            ),
            mode,
            builder: DockerImageBuilder::new(runner, &config.cluster.docker),
            cluster: KubectlControlPlane::new(runner, &config.cluster),
            runner,
            config,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Terminal reporter bound to this context's output.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Wire the production adapters into an `Orchestrator`.
    #[must_use]
    pub fn orchestrator<'a>(
        &'a self,
        reporter: &'a TerminalReporter<'a>,
    ) -> Orchestrator<
        'a,
        DockerImageBuilder<TokioCommandRunner>,
        KubectlControlPlane<TokioCommandRunner>,
        TokioCommandRunner,
        TerminalReporter<'a>,
    > {
        Orchestrator::new(&self.config, &self.builder, &self.cluster, &self.runner, reporter)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `CAMPUSCTL_YES`
    /// env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
