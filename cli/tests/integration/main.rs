//! Integration tests for campusctl
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them reach a cluster: each stops at parsing, configuration or
//! precondition checks, or points the adapters at stub programs.

mod preconditions;
