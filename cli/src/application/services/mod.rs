//! Application services — use-case orchestration.
//!
//! Each service module implements a single workflow stage by composing
//! domain logic with port trait calls. Services import only from
//! `crate::domain` and `crate::application::ports` — never from
//! `crate::infra`, `crate::commands`, or `crate::output`.

pub mod apply;
pub mod build;
pub mod connectivity;
pub mod diagnostics;
pub mod endpoint;
pub mod lifecycle;
pub mod stage;
