//! Output shaping: name filtering, the simplified view, and rendering.

use clap::ValueEnum;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::AuditError;
use crate::items::{ConfigSource, KeyUsage, SourceKind, WorkloadRef};
use crate::registry::Registry;

/// Patterns that keep every entry without compiling a regex.
const MATCH_ALL: &[&str] = &["", "*", ".*"];

/// Keeps registry entries whose composite key matches a regex.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    re: Option<Regex>,
}

impl NameFilter {
    pub fn new(pattern: &str) -> Result<Self, AuditError> {
        if MATCH_ALL.contains(&pattern) {
            return Ok(Self::default());
        }
        let re = Regex::new(pattern).map_err(|source| AuditError::InvalidFilter {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { re: Some(re) })
    }

    /// Unanchored search against the whole `"<kind>/<name>"` key.
    pub fn matches(&self, key: &str) -> bool {
        self.re.as_ref().map_or(true, |re| re.is_match(key))
    }

    pub fn is_match_all(&self) -> bool {
        self.re.is_none()
    }
}

/// Output document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn render<T: Serialize + ?Sized>(self, value: &T) -> anyhow::Result<String> {
        Ok(match self {
            Self::Yaml => serde_yaml::to_string(value)?,
            Self::Json => serde_json::to_string_pretty(value)?,
        })
    }
}

impl FromStr for OutputFormat {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(AuditError::UnknownFormat(other.to_string())),
        }
    }
}

// ─── Simplified view ──────────────────────────────────────────────────────────

/// Per-key usage with empty lists dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimplifiedKey {
    #[serde(rename = "asEnv", skip_serializing_if = "Option::is_none")]
    pub env_users: Option<Vec<WorkloadRef>>,
    #[serde(rename = "asVolume", skip_serializing_if = "Option::is_none")]
    pub volume_users: Option<Vec<WorkloadRef>>,
}

impl SimplifiedKey {
    pub fn simplify(self) -> Self {
        Self {
            env_users: non_empty(self.env_users),
            volume_users: non_empty(self.volume_users),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.env_users.is_none() && self.volume_users.is_none()
    }
}

impl From<&KeyUsage> for SimplifiedKey {
    fn from(usage: &KeyUsage) -> Self {
        Self {
            env_users: Some(usage.env_users.clone()),
            volume_users: Some(usage.volume_users.clone()),
        }
        .simplify()
    }
}

/// A source with its namespace removed and every empty field omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimplifiedSource {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: SourceKind,
    #[serde(rename = "usedAsVolumn", skip_serializing_if = "Option::is_none")]
    pub whole_volume_users: Option<Vec<WorkloadRef>>,
    #[serde(rename = "keyUsed", skip_serializing_if = "Option::is_none")]
    pub key_usage: Option<BTreeMap<String, SimplifiedKey>>,
}

impl SimplifiedSource {
    /// Drop empty lists, empty key records, and an empty key section.
    /// Applying this to an already simplified value changes nothing.
    pub fn simplify(self) -> Self {
        let key_usage = self.key_usage.map(|keys| {
            keys.into_iter()
                .map(|(k, v)| (k, v.simplify()))
                .filter(|(_, v)| !v.is_empty())
                .collect::<BTreeMap<_, _>>()
        });
        Self {
            name: self.name,
            kind: self.kind,
            whole_volume_users: non_empty(self.whole_volume_users),
            key_usage: key_usage.filter(|keys| !keys.is_empty()),
        }
    }
}

impl From<&ConfigSource> for SimplifiedSource {
    fn from(source: &ConfigSource) -> Self {
        Self {
            name: source.name.clone(),
            kind: source.kind,
            whole_volume_users: Some(source.whole_volume_users.clone()),
            key_usage: Some(
                source
                    .key_usage
                    .iter()
                    .map(|(k, v)| (k.clone(), SimplifiedKey::from(v)))
                    .collect(),
            ),
        }
        .simplify()
    }
}

fn non_empty<T>(list: Option<Vec<T>>) -> Option<Vec<T>> {
    list.filter(|l| !l.is_empty())
}

// ─── Projection ───────────────────────────────────────────────────────────────

/// The value handed to the serializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Projection<'a> {
    Full(BTreeMap<&'a str, &'a ConfigSource>),
    Simplified(BTreeMap<&'a str, SimplifiedSource>),
}

impl Projection<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::Full(m) => m.len(),
            Self::Simplified(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Full(m) => m.keys().copied().collect(),
            Self::Simplified(m) => m.keys().copied().collect(),
        }
    }
}

/// Filter a finished registry by name and optionally simplify each entry.
pub fn project<'a>(registry: &'a Registry, filter: &NameFilter, simplify: bool) -> Projection<'a> {
    let kept = registry.iter().filter(|(key, _)| filter.matches(key));
    if simplify {
        Projection::Simplified(kept.map(|(k, v)| (k, SimplifiedSource::from(v))).collect())
    } else {
        Projection::Full(kept.collect())
    }
}
