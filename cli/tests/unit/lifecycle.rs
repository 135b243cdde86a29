//! Lifecycle commands driven end to end through the real docker and kubectl
//! adapters on top of a scripted runner.

#![allow(clippy::expect_used)]

use campusctl::application::services::lifecycle::{LifecycleOutcome, Orchestrator, Report};
use campusctl::domain::config::DeployConfig;
use campusctl::domain::outcome::{Stage, StageFailure};
use campusctl::infra::docker::DockerImageBuilder;
use campusctl::infra::kubectl::KubectlControlPlane;

use crate::helpers::{CRASHING_BACKEND_PODS, RecordingReporter, ScriptedRunner};

const BUILD_BACKEND: &str = "docker build --no-cache -t campusconnect-backend:latest backend";
const BUILD_GATEWAY: &str =
    "docker build --no-cache -t campusconnect-nginx:latest -f nginx/Dockerfile .";

/// Evaluate `$body` with `$orch` bound to an orchestrator using default
/// config, whose builder, control-plane and runner all share `$runner`.
macro_rules! with_orchestrator {
    ($runner:expr, $reporter:expr, |$orch:ident| $body:expr) => {{
        let config = DeployConfig::default();
        let builder = DockerImageBuilder::new($runner, &config.cluster.docker);
        let cluster = KubectlControlPlane::new($runner, &config.cluster);
        let $orch = Orchestrator::new(&config, &builder, &cluster, $runner, $reporter);
        $body
    }};
}

fn aborted(outcome: LifecycleOutcome) -> StageFailure {
    match outcome {
        LifecycleOutcome::Aborted(failure) => failure,
        LifecycleOutcome::Completed(report) => panic!("expected abort, got {report:?}"),
    }
}

// ── deploy ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deploy_runs_stages_in_order_and_prefers_external_ip() {
    let runner = ScriptedRunner::new();
    let reporter = RecordingReporter::default();

    let outcome = with_orchestrator!(&runner, &reporter, |orch| orch.deploy().await);

    let LifecycleOutcome::Completed(report) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    let endpoint = report.endpoint.expect("endpoint");
    assert_eq!(endpoint.url(), "http://203.0.113.7:30080");
    assert_eq!(
        runner.calls(),
        vec![
            BUILD_BACKEND,
            BUILD_GATEWAY,
            "kubectl apply -f k8s/configmap.yaml",
            "kubectl apply -f k8s/",
            "kubectl rollout status deployment/backend",
            "kubectl rollout status deployment/nginx",
            "kubectl get svc myapp-nginx -o json",
            "kubectl get nodes -o json",
        ]
    );
    assert!(reporter.errors.borrow().is_empty());
}

#[tokio::test]
async fn backend_build_failure_stops_before_any_cluster_change() {
    let runner = ScriptedRunner::new().on(BUILD_BACKEND, 2, "");
    let reporter = RecordingReporter::default();

    let outcome = with_orchestrator!(&runner, &reporter, |orch| orch.deploy().await);

    let failure = aborted(outcome);
    assert_eq!(failure.stage, Stage::Build);
    assert_eq!(failure.process_exit_code(), 2);
    assert_eq!(runner.count("docker build"), 1);
    assert_eq!(runner.count("kubectl apply"), 0);
    assert_eq!(runner.count("get pods -l app=backend"), 1);
}

#[tokio::test]
async fn config_apply_failure_only_warns() {
    let runner = ScriptedRunner::new().on("apply -f k8s/configmap.yaml", 1, "");
    let reporter = RecordingReporter::default();

    let outcome = with_orchestrator!(&runner, &reporter, |orch| orch.deploy().await);

    assert!(matches!(outcome, LifecycleOutcome::Completed(_)));
    assert_eq!(runner.count("kubectl apply -f k8s/"), 2);
    let warnings = reporter.warnings.borrow();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("(continuing)"));
}

#[tokio::test]
async fn manifest_directory_failure_is_fatal_with_backend_diagnostics() {
    let runner = ScriptedRunner::new()
        .on("apply -f k8s/", 1, "")
        .on("get pods -l app=backend", 0, CRASHING_BACKEND_PODS)
        .on("logs backend-7d9c-abcde", 0, "Error: MONGO_URI is not defined\n");
    let reporter = RecordingReporter::default();

    let outcome = with_orchestrator!(&runner, &reporter, |orch| orch.deploy().await);

    let failure = aborted(outcome);
    assert_eq!(failure.stage, Stage::ManifestApply);
    assert_eq!(failure.diagnostics.len(), 1);
    assert_eq!(failure.diagnostics[0].instance, "backend-7d9c-abcde");
    assert_eq!(failure.diagnostics[0].log, "Error: MONGO_URI is not defined\n");
    assert_eq!(runner.count("rollout status"), 0);
    assert_eq!(runner.count("logs backend-7d9c-fghij"), 0);
}

#[tokio::test]
async fn gateway_rollout_failure_collects_gateway_diagnostics() {
    let runner = ScriptedRunner::new().on("rollout status deployment/nginx", 1, "");
    let reporter = RecordingReporter::default();

    let outcome = with_orchestrator!(&runner, &reporter, |orch| orch.deploy().await);

    let failure = aborted(outcome);
    assert_eq!(failure.stage, Stage::Rollout);
    assert_eq!(runner.count("get pods -l app=nginx"), 1);
    assert_eq!(runner.count("get svc"), 0);
}

#[tokio::test]
async fn missing_node_port_is_reported_not_fatal() {
    let runner = ScriptedRunner::new().on(
        "get svc",
        0,
        r#"{"metadata":{"name":"myapp-nginx"},"spec":{"ports":[{"port":80}]}}"#,
    );
    let reporter = RecordingReporter::default();

    let outcome = with_orchestrator!(&runner, &reporter, |orch| orch.deploy().await);

    assert_eq!(outcome, LifecycleOutcome::Completed(Report::default()));
    assert_eq!(reporter.errors.borrow().len(), 1);
}

// ── deploy-and-test ──────────────────────────────────────────────────────────

#[tokio::test]
async fn deploy_and_test_runs_suite_in_backend_dir_then_connectivity_job() {
    let runner = ScriptedRunner::new().on("logs job/connectivity-test", 0, "backend: OK\n");
    let reporter = RecordingReporter::default();

    let outcome = with_orchestrator!(&runner, &reporter, |orch| orch.deploy_and_test().await);

    let LifecycleOutcome::Completed(report) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    let conn = report.connectivity.expect("connectivity");
    assert!(conn.completed);
    assert_eq!(conn.log.as_deref(), Some("backend: OK\n"));

    let suite = runner.position("[backend] npm test").expect("suite ran");
    let job = runner
        .position("apply -f k8s/jobs/connectivity-test.yaml")
        .expect("job applied");
    let rollout = runner.position("rollout status deployment/nginx").expect("rollout");
    assert!(rollout < suite && suite < job);
    assert!(job < runner.position("get svc").expect("endpoint"));
}

#[tokio::test]
async fn failing_suite_propagates_exit_code_and_skips_connectivity() {
    let runner = ScriptedRunner::new().on("npm test", 3, "");
    let reporter = RecordingReporter::default();

    let outcome = with_orchestrator!(&runner, &reporter, |orch| orch.deploy_and_test().await);

    let failure = aborted(outcome);
    assert_eq!(failure.stage, Stage::TestSuite);
    assert_eq!(failure.process_exit_code(), 3);
    assert_eq!(runner.count("connectivity-test"), 0);
}

// ── reset / pause / resume ───────────────────────────────────────────────────

#[tokio::test]
async fn reset_tolerates_delete_failure() {
    let runner = ScriptedRunner::new().on("delete -f k8s/", 1, "");
    let reporter = RecordingReporter::default();

    let outcome = with_orchestrator!(&runner, &reporter, |orch| orch.reset().await);

    assert_eq!(outcome, LifecycleOutcome::Completed(Report::default()));
    assert_eq!(runner.calls(), vec!["kubectl delete -f k8s/ --ignore-not-found"]);
    assert_eq!(reporter.warnings.borrow().len(), 1);
}

#[tokio::test]
async fn pause_scales_backend_then_gateway_to_zero() {
    let runner = ScriptedRunner::new();
    let reporter = RecordingReporter::default();

    let outcome = with_orchestrator!(&runner, &reporter, |orch| orch.pause().await);

    assert!(matches!(outcome, LifecycleOutcome::Completed(_)));
    assert_eq!(
        runner.calls(),
        vec![
            "kubectl scale deployment/backend --replicas=0",
            "kubectl scale deployment/nginx --replicas=0",
        ]
    );
}

#[tokio::test]
async fn resume_aborts_on_first_scale_failure() {
    let runner = ScriptedRunner::new().on("scale deployment/backend --replicas=1", 1, "");
    let reporter = RecordingReporter::default();

    let outcome = with_orchestrator!(&runner, &reporter, |orch| orch.resume().await);

    let failure = aborted(outcome);
    assert_eq!(failure.stage, Stage::Scale);
    assert_eq!(runner.count("scale deployment/nginx"), 0);
}
