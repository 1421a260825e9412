//! Entity Flattener
//!
//! Turns protection rule wire objects into flat data-source records.
//! Every absent optional object resolves to an empty or zero value; none
//! of these functions can fail.

use super::params::{CategoryParam, CategoryParamsSet};
use super::record::{
    AvailabilityZoneConnectivityRecord, CategoryFilterRecord, OrderedAvailabilityZoneRecord,
    ProtectionRuleRecord, RetentionPolicyRecord, SnapshotIntervalType, SnapshotScheduleRecord,
};
use crate::prism::models::{
    AvailabilityZoneConnectivity, CategoryFilter, Metadata, OrderedAvailabilityZone,
    ProtectionRuleResponse, Reference, SnapshotRetentionPolicy, SnapshotSchedule,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;

/// Scalar metadata keys copied into the `metadata` mapping
pub const METADATA_KEYS: [&str; 7] = [
    "last_update_time",
    "kind",
    "uuid",
    "creation_time",
    "spec_version",
    "spec_hash",
    "name",
];

/// Flatten a list of protection rules, preserving order one-to-one
pub fn flatten_protection_rule_entities(
    protection_rules: &[ProtectionRuleResponse],
) -> Vec<ProtectionRuleRecord> {
    protection_rules.iter().map(flatten_protection_rule).collect()
}

/// Flatten a single protection rule
pub fn flatten_protection_rule(protection_rule: &ProtectionRuleResponse) -> ProtectionRuleRecord {
    let metadata = protection_rule.metadata.as_ref();
    let (metadata_map, categories) = flatten_metadata(metadata);

    let status = protection_rule.status.as_ref();
    let spec = protection_rule.spec.as_ref();
    let spec_resources = spec.and_then(|s| s.resources.as_ref());

    ProtectionRuleRecord {
        api_version: string_value(&protection_rule.api_version),
        name: string_value(&status.and_then(|s| s.name.clone())),
        description: string_value(&spec.and_then(|s| s.description.clone())),
        state: string_value(&status.and_then(|s| s.state.clone())),
        start_time: string_value(
            &status
                .and_then(|s| s.resources.as_ref())
                .and_then(|r| r.start_time.clone()),
        ),
        metadata: metadata_map,
        categories,
        owner_reference: flatten_reference_values(metadata.and_then(|m| m.owner_reference.as_ref())),
        project_reference: flatten_reference_values(
            metadata.and_then(|m| m.project_reference.as_ref()),
        ),
        availability_zone_connectivity_list: flatten_availability_zone_connectivity_list(
            spec_resources
                .map(|r| r.availability_zone_connectivity_list.as_slice())
                .unwrap_or_default(),
        ),
        ordered_availability_zone_list: flatten_ordered_availability_zone_list(
            spec_resources
                .map(|r| r.ordered_availability_zone_list.as_slice())
                .unwrap_or_default(),
        ),
        category_filter: flatten_category_filter(
            spec_resources.and_then(|r| r.category_filter.as_ref()),
        ),
    }
}

/// Split entity metadata into the scalar mapping and the category mapping
pub fn flatten_metadata(
    metadata: Option<&Metadata>,
) -> (BTreeMap<String, String>, BTreeMap<String, String>) {
    let default = Metadata::default();
    let m = metadata.unwrap_or(&default);

    // Same order as METADATA_KEYS
    let values: [String; METADATA_KEYS.len()] = [
        time_value(m.last_update_time),
        string_value(&m.kind),
        string_value(&m.uuid),
        time_value(m.creation_time),
        m.spec_version.unwrap_or_default().to_string(),
        string_value(&m.spec_hash),
        string_value(&m.name),
    ];
    let flat = METADATA_KEYS
        .iter()
        .map(|key| key.to_string())
        .zip(values)
        .collect();

    (flat, m.categories.clone())
}

/// Flatten a weak reference; an absent reference yields an empty mapping
pub fn flatten_reference_values(reference: Option<&Reference>) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    if let Some(r) = reference {
        flat.insert("kind".to_string(), string_value(&r.kind));
        flat.insert("uuid".to_string(), string_value(&r.uuid));
        if let Some(name) = &r.name {
            flat.insert("name".to_string(), name.clone());
        }
    }
    flat
}

pub fn flatten_availability_zone_connectivity_list(
    connectivity: &[AvailabilityZoneConnectivity],
) -> Vec<AvailabilityZoneConnectivityRecord> {
    connectivity
        .iter()
        .map(|c| AvailabilityZoneConnectivityRecord {
            source_availability_zone_index: c.source_availability_zone_index.unwrap_or_default(),
            destination_availability_zone_index: c
                .destination_availability_zone_index
                .unwrap_or_default(),
            snapshot_schedule_list: c
                .snapshot_schedule_list
                .iter()
                .map(flatten_snapshot_schedule)
                .collect(),
        })
        .collect()
}

fn flatten_snapshot_schedule(schedule: &SnapshotSchedule) -> SnapshotScheduleRecord {
    SnapshotScheduleRecord {
        recovery_point_objective_secs: schedule.recovery_point_objective_secs.unwrap_or_default(),
        auto_suspend_timeout_secs: schedule.auto_suspend_timeout_secs.unwrap_or_default(),
        snapshot_type: string_value(&schedule.snapshot_type),
        local_snapshot_retention_policy: flatten_retention_policy(
            schedule.local_snapshot_retention_policy.as_ref(),
        ),
        remote_snapshot_retention_policy: flatten_retention_policy(
            schedule.remote_snapshot_retention_policy.as_ref(),
        ),
    }
}

/// Flatten a retention policy; absent policies are all zeros
pub fn flatten_retention_policy(policy: Option<&SnapshotRetentionPolicy>) -> RetentionPolicyRecord {
    let Some(policy) = policy else {
        return RetentionPolicyRecord::default();
    };

    let rollup = policy.rollup_retention_policy.as_ref();
    let interval = rollup
        .and_then(|r| r.snapshot_interval_type.as_deref())
        .map(|name| {
            SnapshotIntervalType::from_api(name).unwrap_or_else(|| {
                tracing::warn!("Unknown snapshot interval type: {}", name);
                SnapshotIntervalType::Unspecified
            })
        })
        .unwrap_or_default();

    RetentionPolicyRecord {
        num_snapshots: policy.num_snapshots.unwrap_or_default(),
        rollup_retention_policy_multiple: rollup.and_then(|r| r.multiple).unwrap_or_default(),
        rollup_retention_policy_snapshot_interval_type: interval.code(),
    }
}

pub fn flatten_ordered_availability_zone_list(
    zones: &[OrderedAvailabilityZone],
) -> Vec<OrderedAvailabilityZoneRecord> {
    zones
        .iter()
        .map(|z| OrderedAvailabilityZoneRecord {
            cluster_uuid: string_value(&z.cluster_uuid),
            availability_zone_url: string_value(&z.availability_zone_url),
        })
        .collect()
}

/// Flatten the category filter into a list of at most one element
pub fn flatten_category_filter(filter: Option<&CategoryFilter>) -> Vec<CategoryFilterRecord> {
    let Some(filter) = filter else {
        return Vec::new();
    };

    let params: CategoryParamsSet = filter
        .params
        .iter()
        .map(|(name, values)| CategoryParam::new(name.clone(), values.clone()))
        .collect();

    vec![CategoryFilterRecord {
        filter_type: string_value(&filter.filter_type),
        kind_list: filter.kind_list.clone(),
        params,
    }]
}

fn string_value(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn time_value(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .unwrap_or_default()
}
