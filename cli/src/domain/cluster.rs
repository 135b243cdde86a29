//! Typed control-plane records and the pure rules evaluated over them.
//!
//! Records are decoded from `kubectl ... -o json` output. Required fields
//! are required by serde, so a malformed record fails at the boundary with
//! a [`ClusterError::Decode`] instead of deep inside a stage.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::domain::error::ClusterError;

/// Condition type that marks an instance as serving.
pub const READY_CONDITION: &str = "Ready";
/// Address type preferred when composing an endpoint.
pub const EXTERNAL_IP: &str = "ExternalIP";
/// Address type used when no external address exists.
pub const INTERNAL_IP: &str = "InternalIP";

/// Decode a control-plane JSON document into a typed record.
///
/// # Errors
///
/// Returns [`ClusterError::Decode`] naming `what` when the bytes are not
/// valid JSON or a required field is missing.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], what: &'static str) -> Result<T, ClusterError> {
    serde_json::from_slice(bytes).map_err(|source| ClusterError::Decode { what, source })
}

// ── Pods ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct PodList {
    #[serde(default)]
    pub items: Vec<Pod>,
}

/// A running instance backing a workload.
#[derive(Debug, Clone, Deserialize)]
pub struct Pod {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: PodStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodStatus {
    #[serde(default)]
    pub conditions: Vec<PodCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PodCondition {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
}

impl Pod {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// An instance is ready iff it reports `Ready` with status `True`.
    ///
    /// Comparison is exact and case-sensitive; a missing condition list is
    /// not ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status
            .conditions
            .iter()
            .any(|c| c.kind == READY_CONDITION && c.status == "True")
    }
}

// ── Nodes ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct NodeList {
    #[serde(default)]
    pub items: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub status: NodeStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeStatus {
    #[serde(default)]
    pub addresses: Vec<NodeAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeAddress {
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
}

/// Pick a node address, preferring any `ExternalIP` over any `InternalIP`.
///
/// Within each pass the first match in node order wins. Returns `None`
/// when no node reports an address of either kind.
#[must_use]
pub fn select_node_address(nodes: &[Node]) -> Option<&str> {
    let find = |kind: &str| {
        nodes
            .iter()
            .flat_map(|n| n.status.addresses.iter())
            .find(|a| a.kind == kind)
            .map(|a| a.address.as_str())
    };
    find(EXTERNAL_IP).or_else(|| find(INTERNAL_IP))
}

// ── Services ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    pub metadata: ObjectMeta,
    pub spec: ServiceSpec,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSpec {
    #[serde(default)]
    pub ports: Vec<ServicePort>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServicePort {
    #[serde(rename = "nodePort")]
    pub node_port: Option<u16>,
}

impl Service {
    /// The node port assigned to the first entry of the port list.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::MissingNodePort`] when the service has no
    /// ports or the first port has no node port assigned.
    pub fn node_port(&self) -> Result<u16, ClusterError> {
        self.spec
            .ports
            .first()
            .and_then(|p| p.node_port)
            .ok_or_else(|| ClusterError::MissingNodePort(self.metadata.name.clone()))
    }
}

// ── Endpoint ──────────────────────────────────────────────────────────────────

/// Externally reachable address of the deployed application.
///
/// Recomputed on every request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEndpoint {
    pub address: String,
    pub port: u16,
}

impl ServiceEndpoint {
    #[must_use]
    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}:{}", self.address, self.port)
    }
}
