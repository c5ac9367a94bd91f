//! The cross-reference index of configuration sources and their consumers.
//!
//! A [`Registry`] is seeded from the listed ConfigMaps and Secrets, then every
//! workload is folded into it with [`Registry::resolve`]. References to
//! sources that were never listed get an `unexpected/<kind>` placeholder.
//! A missing key is handled by one of two policies:
//!
//! - volume items are tolerant: the item is skipped and reported
//!   ([`Registry::record_volume_item`]);
//! - environment references are strict: the run aborts
//!   ([`Registry::record_env`]).

use k8s_openapi::api::core::v1::{ConfigMap, EnvVar, KeyToPath, Secret, Volume};
use kube::ResourceExt;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use crate::error::AuditError;
use crate::items::{ConfigSource, SourceKind, WorkloadRef};
use crate::k8s::workloads::Workload;

/// A volume item that named a key its source does not have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKey {
    pub key: String,
    pub source_key: String,
    pub workload: WorkloadRef,
}

impl fmt::Display for MissingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not in {}", self.key, self.source_key)
    }
}

/// Configuration sources keyed by `"<kind>/<name>"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Registry {
    sources: BTreeMap<String, ConfigSource>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a registry with every listed source. Each key in a source's data
    /// gets an empty usage slot up front.
    pub fn from_sources(configmaps: &[ConfigMap], secrets: &[Secret]) -> Self {
        let mut registry = Self::new();
        for cm in configmaps {
            registry.insert(ConfigSource::from(cm));
        }
        for secret in secrets {
            registry.insert(ConfigSource::from(secret));
        }
        registry
    }

    /// Insert a source under its composite key, replacing any previous entry.
    pub fn insert(&mut self, source: ConfigSource) -> Option<ConfigSource> {
        self.sources.insert(source.key(), source)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigSource> {
        self.sources.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sources.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigSource)> {
        self.sources.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Look up a referenced source, inserting an empty placeholder when the
    /// listing never returned it.
    pub fn source_mut(&mut self, kind: SourceKind, name: &str) -> &mut ConfigSource {
        self.sources.entry(kind.key(name)).or_insert_with(|| {
            debug!(source = %kind.key(name), "referenced source was not listed, adding placeholder");
            ConfigSource::unexpected(kind, name)
        })
    }

    /// Fold one workload's volume and environment references into the registry.
    ///
    /// Returns the volume items that were skipped because their key is
    /// unknown. An environment reference to an unknown key is an error.
    pub fn resolve(&mut self, workload: &Workload) -> Result<Vec<MissingKey>, AuditError> {
        let who = &workload.reference;
        let mut missing = Vec::new();

        for volume in &workload.volumes {
            for source in volume_sources(volume) {
                if source.items.is_empty() {
                    self.record_whole_volume(source.kind, source.name, who);
                    continue;
                }
                for item in source.items {
                    if let Err(m) = self.record_volume_item(source.kind, source.name, &item.key, who) {
                        missing.push(m);
                    }
                }
            }
        }

        for env in workload.env_vars() {
            if let Some((kind, name, key)) = env_source(env) {
                self.record_env(kind, name, key, who)?;
            }
        }

        Ok(missing)
    }

    /// Record a volume that mounts the whole source.
    pub fn record_whole_volume(&mut self, kind: SourceKind, name: &str, workload: &WorkloadRef) {
        self.source_mut(kind, name)
            .whole_volume_users
            .push(workload.clone());
    }

    /// Record a volume item that mounts a single key as a file.
    ///
    /// An unknown key is logged and skipped; the run goes on.
    pub fn record_volume_item(
        &mut self,
        kind: SourceKind,
        name: &str,
        key: &str,
        workload: &WorkloadRef,
    ) -> Result<(), MissingKey> {
        let source = self.source_mut(kind, name);
        if let Some(usage) = source.key_usage.get_mut(key) {
            usage.volume_users.push(workload.clone());
            return Ok(());
        }
        let missing = MissingKey {
            key: key.to_string(),
            source_key: kind.key(name),
            workload: workload.clone(),
        };
        warn!(
            key = %missing.key,
            source = %missing.source_key,
            workload = %missing.workload,
            "{missing}"
        );
        Err(missing)
    }

    /// Record an environment variable sourced from a single key.
    ///
    /// An unknown key is fatal.
    pub fn record_env(
        &mut self,
        kind: SourceKind,
        name: &str,
        key: &str,
        workload: &WorkloadRef,
    ) -> Result<(), AuditError> {
        let source = self.source_mut(kind, name);
        let Some(usage) = source.key_usage.get_mut(key) else {
            return Err(AuditError::MissingEnvKey {
                key: key.to_string(),
                source_key: kind.key(name),
                workload: workload.clone(),
            });
        };
        usage.env_users.push(workload.clone());
        Ok(())
    }
}

impl From<&ConfigMap> for ConfigSource {
    fn from(cm: &ConfigMap) -> Self {
        let keys = cm
            .data
            .iter()
            .flat_map(|d| d.keys())
            .chain(cm.binary_data.iter().flat_map(|d| d.keys()))
            .cloned();
        ConfigSource::new(
            SourceKind::ConfigMap,
            cm.namespace().unwrap_or_default(),
            cm.name_any(),
            keys,
        )
    }
}

impl From<&Secret> for ConfigSource {
    fn from(secret: &Secret) -> Self {
        let keys = secret
            .data
            .iter()
            .flat_map(|d| d.keys())
            .chain(secret.string_data.iter().flat_map(|d| d.keys()))
            .cloned();
        ConfigSource::new(
            SourceKind::Secret,
            secret.namespace().unwrap_or_default(),
            secret.name_any(),
            keys,
        )
    }
}

// ─── Reference extraction ─────────────────────────────────────────────────────

/// A configuration source named by a volume, with its explicit item list
/// (empty when the whole source is mounted).
struct VolumeSource<'a> {
    kind: SourceKind,
    name: &'a str,
    items: &'a [KeyToPath],
}

impl<'a> VolumeSource<'a> {
    fn new(kind: SourceKind, name: &'a str, items: Option<&'a Vec<KeyToPath>>) -> Self {
        Self {
            kind,
            name,
            items: items.map(Vec::as_slice).unwrap_or_default(),
        }
    }
}

/// All configuration sources a volume mounts, including projected ones.
fn volume_sources(volume: &Volume) -> Vec<VolumeSource<'_>> {
    let mut out = Vec::new();
    if let Some(cm) = &volume.config_map {
        out.push(VolumeSource::new(SourceKind::ConfigMap, &cm.name, cm.items.as_ref()));
    }
    if let Some(secret) = &volume.secret {
        out.push(VolumeSource::new(
            SourceKind::Secret,
            secret.secret_name.as_deref().unwrap_or_default(),
            secret.items.as_ref(),
        ));
    }
    let projections = volume
        .projected
        .as_ref()
        .and_then(|p| p.sources.as_ref())
        .into_iter()
        .flatten();
    for projection in projections {
        if let Some(cm) = &projection.config_map {
            out.push(VolumeSource::new(SourceKind::ConfigMap, &cm.name, cm.items.as_ref()));
        }
        if let Some(secret) = &projection.secret {
            out.push(VolumeSource::new(SourceKind::Secret, &secret.name, secret.items.as_ref()));
        }
    }
    out
}

/// The `(kind, source name, key)` an environment entry is sourced from, if any.
fn env_source(env: &EnvVar) -> Option<(SourceKind, &str, &str)> {
    let from = env.value_from.as_ref()?;
    if let Some(r) = &from.config_map_key_ref {
        return Some((SourceKind::ConfigMap, r.name.as_str(), r.key.as_str()));
    }
    if let Some(r) = &from.secret_key_ref {
        return Some((SourceKind::Secret, r.name.as_str(), r.key.as_str()));
    }
    None
}
