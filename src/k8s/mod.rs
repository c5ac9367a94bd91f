pub mod client;
pub mod resources;
pub mod workloads;
