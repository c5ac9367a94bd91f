//! Config file loading and the merged run settings.
//!
//! Precedence (highest to lowest): command-line flags, the config file,
//! built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::error::AuditError;
use crate::k8s::client::default_kubeconfig;
use crate::output::{NameFilter, OutputFormat};

pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_NAME_FILTER: &str = ".*";

/// ~/.config/cfgchain/config.toml (platform equivalent elsewhere).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cfgchain").join("config.toml"))
}

/// Optional defaults read from a TOML file. Every key may be omitted.
///
/// ```toml
/// namespace = "payments"
/// format = "json"
/// config-name = "^secret/"
/// simplify = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub namespace: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub format: Option<String>,
    pub config_name: Option<String>,
    pub simplify: Option<bool>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid config file")
    }

    /// Load `explicit` if given (it must exist), otherwise the default path
    /// if a file is there, otherwise empty defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }
}

/// Everything one run needs, validated before the cluster is contacted.
#[derive(Debug, Clone)]
pub struct Settings {
    pub namespace: String,
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub format: OutputFormat,
    pub filter: NameFilter,
    pub simplify: bool,
}

impl Settings {
    /// Merge flags over file values. A bad format or filter pattern fails here.
    pub fn resolve(args: &Args, file: FileConfig) -> Result<Self, AuditError> {
        let format = match (args.format, file.format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(name)) => name.parse()?,
            (None, None) => OutputFormat::default(),
        };
        let filter = NameFilter::new(
            args.config_name
                .as_deref()
                .or(file.config_name.as_deref())
                .unwrap_or(DEFAULT_NAME_FILTER),
        )?;

        Ok(Self {
            namespace: args
                .namespace
                .clone()
                .or(file.namespace)
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            kubeconfig: args.kubeconfig.clone().or(file.kubeconfig),
            context: args.context.clone().or(file.context),
            format,
            filter,
            simplify: args.simplify || file.simplify.unwrap_or(false),
        })
    }

    /// The kubeconfig to read. Falls back to the kubelet's only when neither a
    /// path nor a context was configured.
    pub fn kubeconfig_path(&self) -> Option<PathBuf> {
        match (&self.kubeconfig, &self.context) {
            (Some(path), _) => Some(path.clone()),
            (None, None) => default_kubeconfig(),
            (None, Some(_)) => None,
        }
    }
}
