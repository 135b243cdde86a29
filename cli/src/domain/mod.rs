//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod cluster;
pub mod config;
pub mod error;
pub mod outcome;

pub use cluster::{Node, NodeList, Pod, PodList, Service, ServiceEndpoint, select_node_address};
pub use config::{DeployConfig, WorkloadConfig, check_required_env};
pub use error::{ClusterError, ConfigError, PreconditionError};
pub use outcome::{Diagnostic, RolloutStatus, Stage, StageFailure, StageOutcome};
