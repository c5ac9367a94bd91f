//! cfgchain library — exposes all internal modules so integration tests in tests/ can import them.
//! This is a CLI tool; the lib target exists to give the test suite access to the registry,
//! the workload adapters and the output shaping. `must_use_candidate` and `missing_errors_doc`
//! are suppressed because these are implementation details, not a published library API.
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,   // internal helpers; callers are tests, not library consumers
    clippy::missing_errors_doc,   // every fallible fn returns AuditError or anyhow with context
)]

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod items;
pub mod k8s;
pub mod logging;
pub mod output;
pub mod registry;
