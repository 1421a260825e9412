//! Prism v3 wire models
//!
//! Typed shapes of the `protection_rules` API payloads. Every nested object
//! is optional: the API omits whole sub-objects freely, and absence is
//! resolved to zero values by the flattener rather than at decode time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Treat an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response of `POST /protection_rules/list`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtectionRuleListResponse {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub metadata: Option<ListMetadata>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: Vec<ProtectionRuleResponse>,
}

/// Paging metadata echoed back by list calls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListMetadata {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub length: Option<i64>,
    #[serde(default)]
    pub total_matches: Option<i64>,
}

/// Request body of `POST /protection_rules/list`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRequest {
    pub kind: String,
    pub length: i64,
    pub offset: i64,
}

impl ListRequest {
    pub fn protection_rules(offset: i64, length: i64) -> Self {
        Self {
            kind: "protection_rule".to_string(),
            length,
            offset,
        }
    }
}

/// A single protection rule as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtectionRuleResponse {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub spec: Option<ProtectionRuleSpec>,
    #[serde(default)]
    pub status: Option<ProtectionRuleStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub last_update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub spec_version: Option<i64>,
    #[serde(default)]
    pub spec_hash: Option<String>,
    #[serde(default)]
    pub owner_reference: Option<Reference>,
    #[serde(default)]
    pub project_reference: Option<Reference>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: BTreeMap<String, String>,
}

/// Weak reference to another entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtectionRuleSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub resources: Option<ProtectionRuleResources>,
}

/// Replication configuration, shared by spec and status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtectionRuleResources {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ordered_availability_zone_list: Vec<OrderedAvailabilityZone>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub availability_zone_connectivity_list: Vec<AvailabilityZoneConnectivity>,
    #[serde(default)]
    pub category_filter: Option<CategoryFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderedAvailabilityZone {
    #[serde(default)]
    pub cluster_uuid: Option<String>,
    #[serde(default)]
    pub availability_zone_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityZoneConnectivity {
    #[serde(default)]
    pub source_availability_zone_index: Option<i64>,
    #[serde(default)]
    pub destination_availability_zone_index: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub snapshot_schedule_list: Vec<SnapshotSchedule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSchedule {
    #[serde(default)]
    pub recovery_point_objective_secs: Option<i64>,
    #[serde(default)]
    pub auto_suspend_timeout_secs: Option<i64>,
    #[serde(default)]
    pub snapshot_type: Option<String>,
    #[serde(default)]
    pub local_snapshot_retention_policy: Option<SnapshotRetentionPolicy>,
    #[serde(default)]
    pub remote_snapshot_retention_policy: Option<SnapshotRetentionPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRetentionPolicy {
    #[serde(default)]
    pub num_snapshots: Option<i64>,
    #[serde(default)]
    pub rollup_retention_policy: Option<RollupRetentionPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollupRetentionPolicy {
    #[serde(default)]
    pub multiple: Option<i64>,
    /// One of HOURLY, DAILY, WEEKLY, MONTHLY, YEARLY
    #[serde(default)]
    pub snapshot_interval_type: Option<String>,
}

/// Tag-based selector of the entities a rule protects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryFilter {
    #[serde(default, rename = "type")]
    pub filter_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub kind_list: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtectionRuleStatus {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub resources: Option<ProtectionRuleResources>,
}
