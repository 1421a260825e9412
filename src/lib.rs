//! Protection rules data source for Nutanix Prism Central.
//!
//! Queries the Prism v3 API for protection rules (disaster-recovery
//! replication policies) and flattens them into schema-shaped records for a
//! declarative configuration engine.
//!
//! - [`prism`] - Upstream API client, wire models and errors
//! - [`datasource`] - Flattener, schema and read orchestrator
//! - [`config`] - Connection settings

pub mod config;
pub mod datasource;
pub mod prism;

/// Version injected at compile time via PRISM_DR_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("PRISM_DR_VERSION") {
    Some(v) => v,
    None => "dev",
};
