//! Uniform view over the pod templates of the four audited workload kinds.

use k8s_openapi::api::{
    apps::v1::{DaemonSet, Deployment, StatefulSet},
    core::v1::{Container, EnvVar, PodSpec, ReplicationController, Volume},
};
use kube::{Resource, ResourceExt};

use crate::items::{WorkloadKind, WorkloadRef};

/// The parts of a workload's pod template that can reference configuration.
#[derive(Debug, Clone)]
pub struct Workload {
    pub reference: WorkloadRef,
    pub volumes: Vec<Volume>,
    /// Init containers first, then regular containers.
    pub containers: Vec<Container>,
}

impl Workload {
    pub fn new(reference: WorkloadRef, spec: Option<PodSpec>) -> Self {
        let spec = spec.unwrap_or_default();
        let mut containers = spec.init_containers.unwrap_or_default();
        containers.extend(spec.containers);
        Self {
            reference,
            volumes: spec.volumes.unwrap_or_default(),
            containers,
        }
    }

    /// Every environment entry of every container, in container order.
    pub fn env_vars(&self) -> impl Iterator<Item = &EnvVar> {
        self.containers
            .iter()
            .flat_map(|c| c.env.iter().flatten())
    }
}

/// A workload object that embeds a pod template.
pub trait PodTemplate: Resource + Sized {
    const KIND: WorkloadKind;

    fn into_pod_spec(self) -> Option<PodSpec>;

    fn reference(&self) -> WorkloadRef {
        WorkloadRef::new(Self::KIND, self.name_any())
    }

    fn into_workload(self) -> Workload {
        let reference = self.reference();
        Workload::new(reference, self.into_pod_spec())
    }
}

impl PodTemplate for Deployment {
    const KIND: WorkloadKind = WorkloadKind::Deployment;

    fn into_pod_spec(self) -> Option<PodSpec> {
        self.spec.and_then(|s| s.template.spec)
    }
}

impl PodTemplate for DaemonSet {
    const KIND: WorkloadKind = WorkloadKind::DaemonSet;

    fn into_pod_spec(self) -> Option<PodSpec> {
        self.spec.and_then(|s| s.template.spec)
    }
}

impl PodTemplate for StatefulSet {
    const KIND: WorkloadKind = WorkloadKind::StatefulSet;

    fn into_pod_spec(self) -> Option<PodSpec> {
        self.spec.and_then(|s| s.template.spec)
    }
}

impl PodTemplate for ReplicationController {
    const KIND: WorkloadKind = WorkloadKind::ReplicationController;

    // The template is optional on RCs.
    fn into_pod_spec(self) -> Option<PodSpec> {
        self.spec.and_then(|s| s.template).and_then(|t| t.spec)
    }
}
