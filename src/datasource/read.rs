//! Read Orchestrator
//!
//! One upstream list call, then flatten. The upstream client is passed in
//! explicitly; there is no process-wide handle.

use super::flatten::flatten_protection_rule_entities;
use super::record::ProtectionRulesState;
use super::schema::{check_conformance, protection_rules_schema};
use crate::prism::error::UpstreamError;
use crate::prism::models::ProtectionRuleListResponse;
use uuid::Uuid;

/// Upstream operation the data source consumes
#[async_trait::async_trait]
pub trait ProtectionRuleLister: Send + Sync {
    /// List every protection rule, in server order
    async fn list_all_protection_rules(&self)
        -> Result<ProtectionRuleListResponse, UpstreamError>;
}

/// Read the protection rules data source
///
/// Upstream failures are returned unchanged and no state is produced.
pub async fn read<L>(lister: &L) -> Result<ProtectionRulesState, UpstreamError>
where
    L: ProtectionRuleLister + ?Sized,
{
    let response = lister.list_all_protection_rules().await?;

    let state = ProtectionRulesState {
        id: unique_id(),
        api_version: response.api_version.unwrap_or_default(),
        entities: flatten_protection_rule_entities(&response.entities),
    };

    tracing::info!(
        "Read {} protection rules (api_version {})",
        state.entities.len(),
        state.api_version
    );

    Ok(state)
}

/// Process-unique identifier for a completed read
pub fn unique_id() -> String {
    Uuid::new_v4().to_string()
}

/// Schema violations in a read result; empty when the state conforms
///
/// The synthetic `id` belongs to the engine, not the schema, and is skipped.
pub fn schema_violations(state: &ProtectionRulesState) -> Vec<String> {
    let mut value = match serde_json::to_value(state) {
        Ok(value) => value,
        Err(e) => return vec![format!("<root>: failed to serialize state: {}", e)],
    };
    if let Some(object) = value.as_object_mut() {
        object.remove("id");
    }
    check_conformance(&value, protection_rules_schema())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prism::models::{ProtectionRuleResponse, ProtectionRuleStatus};
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticLister {
        response: ProtectionRuleListResponse,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ProtectionRuleLister for StaticLister {
        async fn list_all_protection_rules(
            &self,
        ) -> Result<ProtectionRuleListResponse, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    struct FailingLister;

    #[async_trait::async_trait]
    impl ProtectionRuleLister for FailingLister {
        async fn list_all_protection_rules(
            &self,
        ) -> Result<ProtectionRuleListResponse, UpstreamError> {
            Err(UpstreamError::Status {
                status: StatusCode::UNAUTHORIZED,
                body: "denied".to_string(),
            })
        }
    }

    fn named(name: &str) -> ProtectionRuleResponse {
        ProtectionRuleResponse {
            status: Some(ProtectionRuleStatus {
                name: Some(name.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_read_sets_api_version_and_entities() {
        let lister = StaticLister {
            response: ProtectionRuleListResponse {
                api_version: Some("3.1".to_string()),
                metadata: None,
                entities: vec![named("a"), named("b")],
            },
            calls: AtomicUsize::new(0),
        };

        let state = read(&lister).await.unwrap();
        assert_eq!(state.api_version, "3.1");
        assert_eq!(state.entities.len(), 2);
        assert_eq!(state.entities[0].name, "a");
        assert_eq!(state.entities[1].name, "b");
        assert!(!state.id.is_empty());
        assert_eq!(lister.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_read_ids_are_unique() {
        let lister = StaticLister {
            response: ProtectionRuleListResponse::default(),
            calls: AtomicUsize::new(0),
        };

        let first = read(&lister).await.unwrap();
        let second = read(&lister).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.entities, second.entities);
    }

    #[tokio::test]
    async fn test_read_propagates_upstream_error() {
        let err = read(&FailingLister).await.unwrap_err();
        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_result_conforms_to_schema() {
        let lister = StaticLister {
            response: ProtectionRuleListResponse {
                api_version: Some("3.1".to_string()),
                metadata: None,
                entities: vec![named("a"), ProtectionRuleResponse::default()],
            },
            calls: AtomicUsize::new(0),
        };

        let state = read(&lister).await.unwrap();
        assert_eq!(schema_violations(&state), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_dropped_metadata_keys_are_violations() {
        let lister = StaticLister {
            response: ProtectionRuleListResponse {
                api_version: Some("3.1".to_string()),
                metadata: None,
                entities: vec![ProtectionRuleResponse::default()],
            },
            calls: AtomicUsize::new(0),
        };

        let mut state = read(&lister).await.unwrap();
        state.entities[0].metadata.remove("uuid");
        state.entities[0].metadata.remove("spec_hash");

        assert_eq!(
            schema_violations(&state),
            vec![
                "entities.0.metadata.uuid: missing computed field".to_string(),
                "entities.0.metadata.spec_hash: missing computed field".to_string(),
            ]
        );
    }
}
