//! Property-based tests for readiness, address selection and exit codes.
//!
//! Uses `proptest` to verify invariants across many random inputs.

use proptest::prelude::*;

use campusctl::domain::cluster::{
    Node, NodeAddress, NodeStatus, ObjectMeta, Pod, PodCondition, PodStatus, select_node_address,
};
use campusctl::domain::config::{is_valid_selector, missing_env};
use campusctl::domain::outcome::{Stage, StageFailure};

fn pod(conditions: Vec<(String, String)>) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: "backend-0".to_string(),
        },
        status: PodStatus {
            conditions: conditions
                .into_iter()
                .map(|(kind, status)| PodCondition { kind, status })
                .collect(),
        },
    }
}

fn node(addresses: Vec<(String, String)>) -> Node {
    Node {
        status: NodeStatus {
            addresses: addresses
                .into_iter()
                .map(|(kind, address)| NodeAddress { kind, address })
                .collect(),
        },
    }
}

fn condition() -> impl Strategy<Value = (String, String)> {
    (
        prop_oneof![
            Just("Ready".to_string()),
            Just("ready".to_string()),
            Just("ContainersReady".to_string()),
            Just("PodScheduled".to_string()),
        ],
        prop_oneof![
            Just("True".to_string()),
            Just("true".to_string()),
            Just("False".to_string()),
            Just("Unknown".to_string()),
        ],
    )
}

fn address() -> impl Strategy<Value = (String, String)> {
    (
        prop_oneof![
            Just("ExternalIP".to_string()),
            Just("InternalIP".to_string()),
            Just("Hostname".to_string()),
        ],
        "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
    )
}

// ============================================================================
// Pod readiness
// ============================================================================

proptest! {
    /// Ready iff some condition is exactly ("Ready", "True").
    #[test]
    fn prop_ready_iff_exact_ready_true(conds in prop::collection::vec(condition(), 0..6)) {
        let expected = conds.iter().any(|(k, s)| k == "Ready" && s == "True");
        prop_assert_eq!(pod(conds).is_ready(), expected);
    }
}

// ============================================================================
// Node address selection
// ============================================================================

proptest! {
    /// Any ExternalIP anywhere beats every InternalIP; the first in order wins.
    #[test]
    fn prop_external_ip_preferred_then_internal(
        nodes in prop::collection::vec(prop::collection::vec(address(), 0..4), 0..5)
    ) {
        let flat: Vec<(String, String)> = nodes.iter().flatten().cloned().collect();
        let first = |kind: &str| flat.iter().find(|(k, _)| k == kind).map(|(_, a)| a.clone());
        let expected = first("ExternalIP").or_else(|| first("InternalIP"));

        let nodes: Vec<Node> = nodes.into_iter().map(node).collect();
        prop_assert_eq!(select_node_address(&nodes).map(str::to_string), expected);
    }
}

// ============================================================================
// Process exit codes
// ============================================================================

proptest! {
    /// A failed stage never maps to exit status 0.
    #[test]
    fn prop_failure_exit_code_is_nonzero(code in proptest::option::of(any::<i32>())) {
        let failure = StageFailure::fatal(Stage::Build, "boom", code);
        let exit = failure.process_exit_code();
        prop_assert!(exit >= 1);
        if let Some(c) = code {
            if (1..=255).contains(&c) {
                prop_assert_eq!(i32::from(exit), c);
            }
        }
    }
}

// ============================================================================
// Environment preconditions and selectors
// ============================================================================

proptest! {
    /// Exactly the unset or empty variables are reported, in order.
    #[test]
    fn prop_missing_env_reports_unset_and_empty(
        vars in prop::collection::vec(("[A-Z]{3,8}", proptest::option::of("[a-z]{0,3}")), 0..6)
    ) {
        let required: Vec<String> = vars.iter().map(|(k, _)| k.clone()).collect();
        let lookup = |name: &str| {
            vars.iter().find(|(k, _)| k == name).and_then(|(_, v)| v.clone())
        };
        let expected: Vec<String> = required
            .iter()
            .filter(|name| lookup(name).is_none_or(|v| v.is_empty()))
            .cloned()
            .collect();
        prop_assert_eq!(missing_env(&required, lookup), expected);
    }

    /// `key=value` selectors built from safe characters are accepted.
    #[test]
    fn prop_simple_selectors_are_valid(key in "[a-z][a-z0-9]{0,10}", value in "[a-z0-9]{0,10}") {
        let selector = format!("{key}={value}");
        prop_assert!(is_valid_selector(&selector));
    }

    /// Selectors without `=` are rejected.
    #[test]
    fn prop_selector_without_equals_is_invalid(text in "[a-z0-9]{1,20}") {
        prop_assert!(!is_valid_selector(&text));
    }
}
