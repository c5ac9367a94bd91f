use thiserror::Error;

use crate::items::WorkloadRef;

/// Fatal conditions of an audit run. Any of these aborts the run with no output.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Listing a resource kind in the target namespace failed.
    #[error("Failed to list {kind}: {source}")]
    List {
        kind: &'static str,
        #[source]
        source: kube::Error,
    },

    /// An environment variable names a key its source does not contain.
    #[error("{key} is not in {source_key} (env of {workload})")]
    MissingEnvKey {
        key: String,
        source_key: String,
        workload: WorkloadRef,
    },

    #[error("invalid name filter '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no such format: {0} (expected yaml or json)")]
    UnknownFormat(String),
}
