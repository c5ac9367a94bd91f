use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The kind of configuration source a registry entry represents.
///
/// `Unexpected*` entries are placeholders for sources that a workload
/// references but that were not returned by the namespace listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SourceKind {
    #[serde(rename = "configmap")]
    ConfigMap,
    #[serde(rename = "secret")]
    Secret,
    #[serde(rename = "unexpected/configmap")]
    UnexpectedConfigMap,
    #[serde(rename = "unexpected/secret")]
    UnexpectedSecret,
}

impl SourceKind {
    /// The label written to the `Type` field of the output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigMap => "configmap",
            Self::Secret => "secret",
            Self::UnexpectedConfigMap => "unexpected/configmap",
            Self::UnexpectedSecret => "unexpected/secret",
        }
    }

    /// The prefix used in composite registry keys. Placeholders share the
    /// prefix of the kind they stand in for.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::ConfigMap | Self::UnexpectedConfigMap => "configmap",
            Self::Secret | Self::UnexpectedSecret => "secret",
        }
    }

    /// The placeholder kind for a reference of this kind.
    pub fn unexpected(self) -> Self {
        match self {
            Self::ConfigMap | Self::UnexpectedConfigMap => Self::UnexpectedConfigMap,
            Self::Secret | Self::UnexpectedSecret => Self::UnexpectedSecret,
        }
    }

    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::UnexpectedConfigMap | Self::UnexpectedSecret)
    }

    /// Composite registry key: `"<prefix>/<name>"`.
    pub fn key(&self, name: &str) -> String {
        format!("{}/{}", self.prefix(), name)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four workload kinds whose pod templates are audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    Deployment,
    DaemonSet,
    StatefulSet,
    ReplicationController,
}

impl WorkloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "deployment",
            Self::DaemonSet => "daemonset",
            Self::StatefulSet => "statefulset",
            Self::ReplicationController => "rc",
        }
    }

    /// Plural resource name, used in listing error messages.
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Deployment => "deployments",
            Self::DaemonSet => "daemonsets",
            Self::StatefulSet => "statefulsets",
            Self::ReplicationController => "replicationcontrollers",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a consuming workload as `"<kind>/<name>"`, e.g. `deployment/web`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WorkloadRef(String);

impl WorkloadRef {
    pub fn new(kind: WorkloadKind, name: impl AsRef<str>) -> Self {
        Self(format!("{}/{}", kind.as_str(), name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who consumes one key of a source, and how.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyUsage {
    #[serde(rename = "asEnv")]
    pub env_users: Vec<WorkloadRef>,
    #[serde(rename = "asVolumn")]
    pub volume_users: Vec<WorkloadRef>,
}

impl KeyUsage {
    pub fn is_unused(&self) -> bool {
        self.env_users.is_empty() && self.volume_users.is_empty()
    }
}

/// One ConfigMap or Secret together with everything that references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSource {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: SourceKind,
    #[serde(rename = "Namespace")]
    pub namespace: String,
    #[serde(rename = "usedAsVolumn")]
    pub whole_volume_users: Vec<WorkloadRef>,
    #[serde(rename = "keyUsed")]
    pub key_usage: BTreeMap<String, KeyUsage>,
}

impl ConfigSource {
    /// A listed source with an empty usage slot for every known key.
    pub fn new<I, K>(
        kind: SourceKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
        keys: I,
    ) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            name: name.into(),
            kind,
            namespace: namespace.into(),
            whole_volume_users: Vec::new(),
            key_usage: keys
                .into_iter()
                .map(|k| (k.into(), KeyUsage::default()))
                .collect(),
        }
    }

    /// A placeholder for a referenced source that the listing did not return.
    pub fn unexpected(kind: SourceKind, name: impl Into<String>) -> Self {
        Self::new(kind.unexpected(), String::new(), name, std::iter::empty::<String>())
    }

    /// Composite registry key for this source.
    pub fn key(&self) -> String {
        self.kind.key(&self.name)
    }
}
