//! Prism Client
//!
//! Main client for the Prism Central v3 API, combining credentials and
//! HTTP functionality.

use super::auth::Credentials;
use super::error::UpstreamError;
use super::http::PrismHttpClient;
use super::models::{ListRequest, ProtectionRuleListResponse};
use crate::config::ConnectionConfig;
use crate::datasource::ProtectionRuleLister;
use url::Url;

/// Page size for list calls
pub const ITEMS_PER_PAGE: i64 = 100;

/// Main Prism client
#[derive(Clone)]
pub struct PrismClient {
    pub credentials: Credentials,
    pub http: PrismHttpClient,
    base_url: Url,
}

impl PrismClient {
    /// Create a new Prism client
    pub fn new(config: &ConnectionConfig) -> Result<Self, UpstreamError> {
        let http = PrismHttpClient::new(config.insecure)?;
        let base_url = base_url(&config.endpoint, config.port)?;

        tracing::debug!("Prism client for {}", base_url);

        Ok(Self {
            credentials: config.credentials.clone(),
            http,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a v3 API URL
    pub fn v3_url(&self, path: &str) -> Result<String, UpstreamError> {
        Ok(self
            .base_url
            .join("api/nutanix/v3/")?
            .join(path.trim_start_matches('/'))?
            .to_string())
    }

    /// Fetch one page of protection rules
    pub async fn list_protection_rules(
        &self,
        offset: i64,
        length: i64,
    ) -> Result<ProtectionRuleListResponse, UpstreamError> {
        let url = self.v3_url("protection_rules/list")?;
        let body = ListRequest::protection_rules(offset, length);
        self.http.post(&url, &self.credentials, &body).await
    }

    /// Fetch every protection rule, following offset pagination
    ///
    /// The returned response keeps the first page's `api_version` and
    /// metadata; `entities` holds all pages in server order.
    pub async fn list_all_protection_rules(
        &self,
    ) -> Result<ProtectionRuleListResponse, UpstreamError> {
        let mut response = self.list_protection_rules(0, ITEMS_PER_PAGE).await?;

        let total = response
            .metadata
            .as_ref()
            .and_then(|m| m.total_matches)
            .unwrap_or(response.entities.len() as i64);
        let mut offset = response.entities.len() as i64;

        while offset < total {
            let page = self.list_protection_rules(offset, ITEMS_PER_PAGE).await?;
            if page.entities.is_empty() {
                tracing::warn!(
                    "Server reported {} protection rules but returned an empty page at offset {}",
                    total,
                    offset
                );
                break;
            }
            offset += page.entities.len() as i64;
            response.entities.extend(page.entities);
        }

        tracing::debug!("Fetched {} protection rules", response.entities.len());
        Ok(response)
    }
}

#[async_trait::async_trait]
impl ProtectionRuleLister for PrismClient {
    async fn list_all_protection_rules(
        &self,
    ) -> Result<ProtectionRuleListResponse, UpstreamError> {
        PrismClient::list_all_protection_rules(self).await
    }
}

/// Resolve the API root from a bare host or a full URL
///
/// A bare host gets `https://` and the configured port; an explicit
/// `http://` or `https://` URL is used as given.
fn base_url(endpoint: &str, port: u16) -> Result<Url, UpstreamError> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(&format!("{}/", endpoint))?
    } else {
        Url::parse(&format!("https://{}:{}/", endpoint, port))?
    };
    Ok(url)
}
