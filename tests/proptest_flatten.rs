//! Property-based tests using proptest
//!
//! These tests verify the flattener's structural guarantees (order,
//! purity, zero-value degradation) and the identity rules of the category
//! params set using randomized inputs.

use prism_dr::datasource::{
    flatten_protection_rule_entities, hash_category_param, schema_violations, CategoryParam,
    CategoryParamsSet, ProtectionRulesState, RetentionPolicyRecord,
};
use prism_dr::prism::models::{
    AvailabilityZoneConnectivity, Metadata, OrderedAvailabilityZone, ProtectionRuleResources,
    ProtectionRuleResponse, ProtectionRuleSpec, ProtectionRuleStatus, Reference,
    SnapshotRetentionPolicy, SnapshotSchedule,
};
use proptest::prelude::*;

fn arb_reference() -> impl Strategy<Value = Option<Reference>> {
    prop::option::of(
        (
            prop_oneof!["user", "project"],
            "[a-f0-9]{8}",
            prop::option::of("[a-z]{1,10}"),
        )
            .prop_map(|(kind, uuid, name)| Reference {
                kind: Some(kind.to_string()),
                uuid: Some(uuid),
                name,
            }),
    )
}

fn arb_schedule() -> impl Strategy<Value = SnapshotSchedule> {
    (
        prop::option::of(0i64..86_400),
        prop::option::of(0i64..3600),
        prop::option::of(prop_oneof!["CRASH_CONSISTENT", "APPLICATION_CONSISTENT"]),
        prop::option::of(0i64..100),
        prop::option::of(0i64..100),
    )
        .prop_map(|(rpo, suspend, snapshot_type, local, remote)| SnapshotSchedule {
            recovery_point_objective_secs: rpo,
            auto_suspend_timeout_secs: suspend,
            snapshot_type: snapshot_type.map(|s| s.to_string()),
            local_snapshot_retention_policy: local.map(|n| SnapshotRetentionPolicy {
                num_snapshots: Some(n),
                rollup_retention_policy: None,
            }),
            remote_snapshot_retention_policy: remote.map(|n| SnapshotRetentionPolicy {
                num_snapshots: Some(n),
                rollup_retention_policy: None,
            }),
        })
}

/// Generate arbitrary protection rules, with optional parts often absent
fn arb_rule() -> impl Strategy<Value = ProtectionRuleResponse> {
    (
        "[a-z][a-z0-9-]{0,20}",
        prop_oneof!["COMPLETE", "PENDING", "ERROR"],
        arb_reference(),
        arb_reference(),
        prop::collection::vec(arb_schedule(), 0..4),
        0usize..4,
        any::<bool>(),
    )
        .prop_map(
            |(name, state, owner, project, schedules, zones, has_spec)| ProtectionRuleResponse {
                api_version: Some("3.1".to_string()),
                metadata: Some(Metadata {
                    name: Some(name.clone()),
                    owner_reference: owner,
                    project_reference: project,
                    ..Default::default()
                }),
                spec: has_spec.then(|| ProtectionRuleSpec {
                    name: Some(name.clone()),
                    description: None,
                    resources: Some(ProtectionRuleResources {
                        start_time: None,
                        ordered_availability_zone_list: (0..zones)
                            .map(|i| OrderedAvailabilityZone {
                                cluster_uuid: Some(format!("cluster-{}", i)),
                                availability_zone_url: Some(format!("az-{}", i)),
                            })
                            .collect(),
                        availability_zone_connectivity_list: vec![AvailabilityZoneConnectivity {
                            source_availability_zone_index: Some(0),
                            destination_availability_zone_index: Some(1),
                            snapshot_schedule_list: schedules,
                        }],
                        category_filter: None,
                    }),
                }),
                status: Some(ProtectionRuleStatus {
                    name: Some(name),
                    state: Some(state.to_string()),
                    resources: None,
                }),
            },
        )
}

fn arb_rule_list() -> impl Strategy<Value = Vec<ProtectionRuleResponse>> {
    prop::collection::vec(arb_rule(), 0..20)
}

fn arb_params() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    prop::collection::vec(
        ("[A-Z][a-z]{1,8}", prop::collection::vec("[A-Za-z]{1,8}", 1..4)),
        0..6,
    )
}

fn to_set(params: &[(String, Vec<String>)]) -> CategoryParamsSet {
    params
        .iter()
        .map(|(name, values)| CategoryParam::new(name.clone(), values.clone()))
        .collect()
}

proptest! {
    /// Output has one record per input, in input order
    #[test]
    fn flatten_preserves_length_and_order(rules in arb_rule_list()) {
        let records = flatten_protection_rule_entities(&rules);
        prop_assert_eq!(records.len(), rules.len());
        for (rule, record) in rules.iter().zip(&records) {
            let expected = rule.status.as_ref().and_then(|s| s.name.clone()).unwrap_or_default();
            prop_assert_eq!(&record.name, &expected);
        }
    }

    /// Flattening the same input twice gives identical output
    #[test]
    fn flatten_is_pure(rules in arb_rule_list()) {
        prop_assert_eq!(
            flatten_protection_rule_entities(&rules),
            flatten_protection_rule_entities(&rules)
        );
    }

    /// Absent references become empty mappings
    #[test]
    fn absent_references_are_empty(rule in arb_rule()) {
        let record = &flatten_protection_rule_entities(std::slice::from_ref(&rule))[0];
        let metadata = rule.metadata.as_ref().unwrap();
        prop_assert_eq!(metadata.owner_reference.is_none(), record.owner_reference.is_empty());
        prop_assert_eq!(metadata.project_reference.is_none(), record.project_reference.is_empty());
    }

    /// Absent retention policies flatten to all zeros
    #[test]
    fn absent_remote_policy_is_zero(rule in arb_rule()) {
        let record = &flatten_protection_rule_entities(std::slice::from_ref(&rule))[0];
        let schedules = rule
            .spec
            .as_ref()
            .and_then(|s| s.resources.as_ref())
            .map(|r| r.availability_zone_connectivity_list[0].snapshot_schedule_list.clone())
            .unwrap_or_default();

        for (i, schedule) in schedules.iter().enumerate() {
            let flat = &record.availability_zone_connectivity_list[0].snapshot_schedule_list[i];
            if schedule.remote_snapshot_retention_policy.is_none() {
                prop_assert_eq!(flat.remote_snapshot_retention_policy, RetentionPolicyRecord::default());
            }
        }
    }

    /// Every flattened record conforms to the declared schema
    #[test]
    fn flattened_output_conforms(rules in arb_rule_list()) {
        let state = ProtectionRulesState {
            id: "test".to_string(),
            api_version: "3.1".to_string(),
            entities: flatten_protection_rule_entities(&rules),
        };
        prop_assert!(schema_violations(&state).is_empty());
    }

    /// Member order does not affect the params set
    #[test]
    fn params_set_ignores_member_order(params in arb_params()) {
        let mut reversed = params.clone();
        reversed.reverse();
        prop_assert_eq!(to_set(&params), to_set(&reversed));
    }

    /// Reordering values within a member changes its identity
    #[test]
    fn value_order_changes_identity(
        name in "[A-Z][a-z]{1,8}",
        values in prop::collection::vec("[A-Za-z]{1,8}", 2..5)
    ) {
        let mut reversed = values.clone();
        reversed.reverse();
        prop_assume!(reversed != values);
        prop_assert_ne!(
            hash_category_param(&name, &values),
            hash_category_param(&name, &reversed)
        );
    }
}
