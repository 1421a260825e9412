//! Protection rules data source
//!
//! Reads protection rules from the upstream API and exposes them as flat,
//! schema-shaped records for a declarative configuration engine.
//!
//! # Architecture
//!
//! - [`read`] - Orchestrates one list call plus flatten, assigns the id
//! - [`flatten`] - Maps wire objects to records, never failing on absence
//! - [`record`] - Typed output records
//! - [`params`] - Hash-identified set of category filter params
//! - [`schema`] - Field declarations and output conformance check
//!
//! # Example
//!
//! ```ignore
//! use prism_dr::datasource;
//! use prism_dr::prism::PrismClient;
//!
//! async fn example(client: &PrismClient) -> Result<(), UpstreamError> {
//!     let state = datasource::read(client).await?;
//!     println!("{} rules", state.entities.len());
//!     Ok(())
//! }
//! ```

pub mod flatten;
pub mod params;
pub mod read;
pub mod record;
pub mod schema;

pub use flatten::flatten_protection_rule_entities;
pub use params::{hash_category_param, CategoryParam, CategoryParamsSet};
pub use read::{read, schema_violations, unique_id, ProtectionRuleLister};
pub use record::*;
pub use schema::{check_conformance, protection_rules_schema, render_schema};
