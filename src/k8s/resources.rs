use k8s_openapi::{
    api::{
        apps::v1::{DaemonSet, Deployment, StatefulSet},
        core::v1::{ConfigMap, ReplicationController, Secret},
    },
    NamespaceResourceScope,
};
use kube::{
    api::{Api, ListParams},
    Client, Resource,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AuditError;
use crate::k8s::workloads::{PodTemplate, Workload};

/// Every ConfigMap and Secret in one namespace.
#[derive(Debug, Clone, Default)]
pub struct SourceLists {
    pub configmaps: Vec<ConfigMap>,
    pub secrets: Vec<Secret>,
}

/// List the configuration sources of a namespace. ConfigMaps first, then Secrets.
pub async fn list_sources(client: &Client, namespace: &str) -> Result<SourceLists, AuditError> {
    let configmaps = list_typed::<ConfigMap>(client, namespace, "configmaps").await?;
    let secrets = list_typed::<Secret>(client, namespace, "secrets").await?;
    Ok(SourceLists { configmaps, secrets })
}

/// List the four workload kinds of a namespace and flatten them into the
/// uniform [`Workload`] shape, in the order deployments, daemonsets,
/// statefulsets, replication controllers.
///
/// The four lists are fetched concurrently; the first failure wins.
pub async fn list_workloads(client: &Client, namespace: &str) -> Result<Vec<Workload>, AuditError> {
    let (deployments, daemonsets, statefulsets, rcs) = futures::try_join!(
        list_pod_templates::<Deployment>(client, namespace),
        list_pod_templates::<DaemonSet>(client, namespace),
        list_pod_templates::<StatefulSet>(client, namespace),
        list_pod_templates::<ReplicationController>(client, namespace),
    )?;

    Ok(deployments
        .into_iter()
        .chain(daemonsets)
        .chain(statefulsets)
        .chain(rcs)
        .collect())
}

async fn list_pod_templates<T>(client: &Client, namespace: &str) -> Result<Vec<Workload>, AuditError>
where
    T: PodTemplate
        + Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + DeserializeOwned
        + Clone
        + std::fmt::Debug,
{
    let items = list_typed::<T>(client, namespace, T::KIND.plural()).await?;
    Ok(items.into_iter().map(PodTemplate::into_workload).collect())
}

// ─── Generic typed lister ────────────────────────────────────────────────────

/// List all resources of type `T` in `namespace`.
async fn list_typed<T>(client: &Client, namespace: &str, kind: &'static str) -> Result<Vec<T>, AuditError>
where
    T: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + DeserializeOwned
        + Clone
        + std::fmt::Debug,
{
    let api: Api<T> = Api::namespaced(client.clone(), namespace);
    let list = api
        .list(&ListParams::default())
        .await
        .map_err(|source| AuditError::List { kind, source })?;
    debug!(kind, namespace, count = list.items.len(), "listed");
    Ok(list.items)
}
