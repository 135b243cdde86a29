//! Configuration and environment checks that run before any stage.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REQUIRED: [&str; 6] = [
    "NODE_ENV",
    "PORT",
    "MONGO_URI",
    "REDIS_HOST",
    "REDIS_PORT",
    "SESSION_SECRET",
];

/// Command run from an empty temp dir with none of the required env set.
fn campusctl(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("campusctl"));
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("CAMPUSCTL_CONFIG");
    for var in REQUIRED {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_missing_explicit_config_exits_one() {
    let dir = TempDir::new().expect("temp dir");
    campusctl(&dir)
        .args(["--config", "nope.yaml", "pause"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("nope.yaml"));
}

#[test]
fn test_invalid_config_exits_one() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("campusctl.yaml"), "service: \"\"\n").expect("write");
    campusctl(&dir)
        .arg("endpoint")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("service"));
}

#[test]
fn test_deploy_without_env_lists_every_missing_variable() {
    let dir = TempDir::new().expect("temp dir");
    let mut assert = campusctl(&dir).arg("deploy").assert().code(1);
    for var in REQUIRED {
        assert = assert.stderr(predicate::str::contains(var));
    }
}

#[test]
fn test_test_command_reports_only_unset_variables() {
    let dir = TempDir::new().expect("temp dir");
    let mut cmd = campusctl(&dir);
    for var in REQUIRED.iter().filter(|v| **v != "SESSION_SECRET") {
        cmd.env(var, "x");
    }
    cmd.arg("test")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Missing required environment variables: SESSION_SECRET",
        ));
}

#[test]
fn test_precondition_failure_json_error_object() {
    let dir = TempDir::new().expect("temp dir");
    let output = campusctl(&dir)
        .args(["deploy", "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "precondition_failed");
}

#[test]
fn test_empty_required_env_list_skips_check_and_reaches_builder() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("campusctl.yaml"),
        "required_env: []\ncluster:\n  docker: campusctl-no-such-docker\n  kubectl: campusctl-no-such-kubectl\n",
    )
    .expect("write");
    campusctl(&dir)
        .arg("deploy")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("build failed"));
}

#[test]
#[cfg(unix)]
fn test_failing_builder_exit_code_is_propagated() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("campusctl.yaml"),
        "required_env: []\ncluster:\n  docker: \"false\"\n  kubectl: \"true\"\n",
    )
    .expect("write");
    campusctl(&dir)
        .arg("deploy")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("`false build --no-cache"));
}

#[test]
#[cfg(unix)]
fn test_pause_with_stub_kubectl_succeeds() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("campusctl.yaml"),
        "cluster:\n  kubectl: \"true\"\n",
    )
    .expect("write");
    campusctl(&dir)
        .arg("pause")
        .assert()
        .success()
        .stdout(predicate::str::contains("backend scaled to 0"))
        .stdout(predicate::str::contains("nginx scaled to 0"));
}

#[test]
#[cfg(unix)]
fn test_deploy_json_stdout_is_single_document_despite_chatty_builder() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("campusctl.yaml"),
        "required_env: []\ncluster:\n  docker: echo\n  kubectl: \"false\"\n",
    )
    .expect("write");
    let output = campusctl(&dir)
        .args(["deploy", "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["status"], "aborted");
    assert_eq!(value["failure"]["stage"], "manifest-apply");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("build --no-cache"), "got: {stderr}");
}

#[test]
#[cfg(unix)]
fn test_diagnose_fails_when_pods_cannot_be_listed() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("campusctl.yaml"),
        "cluster:\n  kubectl: \"false\"\n",
    )
    .expect("write");
    campusctl(&dir)
        .args(["diagnose", "app=backend"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stdout(predicate::str::contains("no unready pods").not());
}
