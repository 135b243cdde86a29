//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Precondition errors ───────────────────────────────────────────────────────

/// Errors raised before any stage runs.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to deployment configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: must not be empty")]
    Empty { key: String },

    #[error("Invalid label selector for {key}: '{value}' (expected key=value)")]
    InvalidSelector { key: String, value: String },

    #[error("Invalid value for {key}: {value} (expected 1..={max})")]
    OutOfRange { key: String, value: u64, max: u64 },

    #[error("Config file not found: {0}")]
    NotFound(String),
}

// ── Cluster record errors ─────────────────────────────────────────────────────

/// Errors raised at the control-plane boundary when a record is malformed.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("cannot decode {what} from control-plane output: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("service '{0}' exposes no nodePort on its first port")]
    MissingNodePort(String),
}
