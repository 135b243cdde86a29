//! Stage outcomes produced by the deployment workflow.

use std::fmt;

use serde::Serialize;

/// Workflow stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Build,
    ConfigApply,
    ManifestApply,
    Rollout,
    TestSuite,
    Connectivity,
    Scale,
    Reset,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Build => "image build",
            Self::ConfigApply => "config apply",
            Self::ManifestApply => "manifest apply",
            Self::Rollout => "rollout",
            Self::TestSuite => "test suite",
            Self::Connectivity => "connectivity check",
            Self::Scale => "scale",
            Self::Reset => "reset",
        };
        f.write_str(s)
    }
}

/// Logs captured from one not-ready instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub instance: String,
    pub log: String,
}

/// Convergence state of a workload's rollout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutStatus {
    Pending,
    Converged,
    Failed,
}

impl RolloutStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Converged | Self::Failed)
    }
}

/// Failure of one stage.
///
/// `reason` carries the failing command line and its error text.
/// A `recoverable` failure is reported and the workflow continues;
/// any other failure halts the lifecycle command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub reason: String,
    pub exit_code: Option<i32>,
    pub recoverable: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl StageFailure {
    #[must_use]
    pub fn fatal(stage: Stage, reason: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            stage,
            reason: reason.into(),
            exit_code,
            recoverable: false,
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn recoverable(stage: Stage, reason: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            recoverable: true,
            ..Self::fatal(stage, reason, exit_code)
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Exit status for the invoking shell: the child's code clamped to
    /// `1..=255`, or `1` when the child produced no usable code.
    #[must_use]
    pub fn process_exit_code(&self) -> u8 {
        match self.exit_code {
            Some(code) if (1..=255).contains(&code) => u8::try_from(code).unwrap_or(1),
            Some(code) if code > 255 => 255,
            _ => 1,
        }
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.reason)
    }
}

/// Result of one workflow stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Success,
    Failure(StageFailure),
}

impl StageOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Convert into a `Result` so stages can be chained with `?`.
    ///
    /// # Errors
    ///
    /// Returns the contained [`StageFailure`].
    pub fn into_result(self) -> Result<(), StageFailure> {
        match self {
            Self::Success => Ok(()),
            Self::Failure(f) => Err(f),
        }
    }
}

impl From<Result<(), StageFailure>> for StageOutcome {
    fn from(res: Result<(), StageFailure>) -> Self {
        match res {
            Ok(()) => Self::Success,
            Err(f) => Self::Failure(f),
        }
    }
}
