//! Prism API interaction module
//!
//! This module provides the upstream side of the data source: typed wire
//! models, basic-auth credentials, an HTTP wrapper and the v3 client.
//!
//! # Module Structure
//!
//! - [`auth`] - Basic-auth credentials and their environment variables
//! - [`client`] - Main Prism client for making API requests
//! - [`error`] - Upstream error taxonomy and display formatting
//! - [`http`] - HTTP utilities for REST API calls
//! - [`models`] - Protection rule wire models
//!
//! # Example
//!
//! ```ignore
//! use prism_dr::prism::client::PrismClient;
//!
//! async fn example(config: &ConnectionConfig) -> Result<(), UpstreamError> {
//!     let client = PrismClient::new(config)?;
//!     let rules = client.list_all_protection_rules().await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod models;

pub use client::PrismClient;
pub use error::{format_upstream_error, UpstreamError};
