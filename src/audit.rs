//! One audit run: list, seed the registry, resolve every workload.

use kube::Client;
use tracing::info;

use crate::error::AuditError;
use crate::k8s::resources::{list_sources, list_workloads, SourceLists};
use crate::k8s::workloads::Workload;
use crate::registry::{MissingKey, Registry};

/// The finished registry plus every volume item that was skipped.
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub registry: Registry,
    pub missing: Vec<MissingKey>,
}

/// Build the registry from already-listed objects.
///
/// Workloads are resolved in order; the first strict failure stops the run
/// and later workloads are not looked at.
pub fn build_registry(sources: &SourceLists, workloads: &[Workload]) -> Result<AuditReport, AuditError> {
    let mut registry = Registry::from_sources(&sources.configmaps, &sources.secrets);
    let mut missing = Vec::new();
    for workload in workloads {
        missing.extend(registry.resolve(workload)?);
    }
    Ok(AuditReport { registry, missing })
}

/// Audit a live namespace.
pub async fn audit_namespace(client: &Client, namespace: &str) -> Result<AuditReport, AuditError> {
    let sources = list_sources(client, namespace).await?;
    let workloads = list_workloads(client, namespace).await?;
    info!(
        namespace,
        configmaps = sources.configmaps.len(),
        secrets = sources.secrets.len(),
        workloads = workloads.len(),
        "resolving references"
    );

    let report = build_registry(&sources, &workloads)?;
    if !report.missing.is_empty() {
        info!(count = report.missing.len(), "volume items skipped for unknown keys");
    }
    Ok(report)
}
