//! Flattened data-source records
//!
//! Statically typed shapes of what the protection rules data source
//! exposes. Serialized field names are the data-source schema keys.

use super::params::CategoryParamsSet;
use serde::Serialize;
use std::collections::BTreeMap;

/// Computed state of one data-source read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtectionRulesState {
    /// Synthetic identifier marking the read complete
    pub id: String,
    pub api_version: String,
    pub entities: Vec<ProtectionRuleRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProtectionRuleRecord {
    pub api_version: String,
    pub name: String,
    pub description: String,
    pub state: String,
    pub start_time: String,
    pub metadata: BTreeMap<String, String>,
    pub categories: BTreeMap<String, String>,
    pub owner_reference: BTreeMap<String, String>,
    pub project_reference: BTreeMap<String, String>,
    pub availability_zone_connectivity_list: Vec<AvailabilityZoneConnectivityRecord>,
    pub ordered_availability_zone_list: Vec<OrderedAvailabilityZoneRecord>,
    /// Zero or one element
    pub category_filter: Vec<CategoryFilterRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AvailabilityZoneConnectivityRecord {
    pub source_availability_zone_index: i64,
    pub destination_availability_zone_index: i64,
    pub snapshot_schedule_list: Vec<SnapshotScheduleRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotScheduleRecord {
    pub recovery_point_objective_secs: i64,
    pub auto_suspend_timeout_secs: i64,
    pub snapshot_type: String,
    pub local_snapshot_retention_policy: RetentionPolicyRecord,
    pub remote_snapshot_retention_policy: RetentionPolicyRecord,
}

/// Retention policy; all zeros when the API omitted it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RetentionPolicyRecord {
    pub num_snapshots: i64,
    pub rollup_retention_policy_multiple: i64,
    pub rollup_retention_policy_snapshot_interval_type: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderedAvailabilityZoneRecord {
    pub cluster_uuid: String,
    pub availability_zone_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryFilterRecord {
    #[serde(rename = "type")]
    pub filter_type: String,
    pub kind_list: Vec<String>,
    pub params: CategoryParamsSet,
}

/// Integer codes for rollup snapshot interval types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SnapshotIntervalType {
    #[default]
    Unspecified,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl SnapshotIntervalType {
    /// Parse the API's upper-case name; unknown names yield `None`
    pub fn from_api(name: &str) -> Option<Self> {
        match name {
            "HOURLY" => Some(Self::Hourly),
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Integer code stored in the flattened record
    ///
    /// The numbering is local to this crate: the API only sends the interval
    /// name, and any name `from_api` does not recognise collapses to 0.
    pub fn code(self) -> i64 {
        match self {
            Self::Unspecified => 0,
            Self::Hourly => 1,
            Self::Daily => 2,
            Self::Weekly => 3,
            Self::Monthly => 4,
            Self::Yearly => 5,
        }
    }
}
