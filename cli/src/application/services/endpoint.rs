//! Endpoint resolution: node address + service node port.
//!
//! Read-only against the control-plane; safe to call repeatedly.

use anyhow::{Context, Result};

use crate::application::ports::ResourceInspector;
use crate::domain::cluster::{NodeList, Service, ServiceEndpoint, decode, select_node_address};

/// Resolve the externally reachable URL of `service`.
///
/// Returns `Ok(None)` when no node reports an `ExternalIP` or
/// `InternalIP` address.
///
/// # Errors
///
/// Returns an error if either query fails, a record cannot be decoded, or
/// the service has no node port.
pub async fn resolve_endpoint(
    cluster: &impl ResourceInspector,
    service: &str,
) -> Result<Option<ServiceEndpoint>> {
    let exec = cluster
        .service(service)
        .await
        .with_context(|| format!("querying service {service}"))?;
    anyhow::ensure!(exec.success(), "{}", exec.failure_reason());
    let port = decode::<Service>(&exec.stdout, "service")?.node_port()?;

    let exec = cluster.nodes().await.context("querying nodes")?;
    anyhow::ensure!(exec.success(), "{}", exec.failure_reason());
    let nodes: NodeList = decode(&exec.stdout, "node list")?;

    Ok(select_node_address(&nodes.items).map(|address| ServiceEndpoint {
        address: address.to_string(),
        port,
    }))
}
