//! HTTP utilities for Prism REST API calls

use super::auth::Credentials;
use super::error::UpstreamError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = body
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|i| *i <= MAX_LOG_BODY_LENGTH)
            .last()
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for Prism API calls
#[derive(Clone)]
pub struct PrismHttpClient {
    client: Client,
}

impl PrismHttpClient {
    /// Create a new HTTP client
    ///
    /// `insecure` disables certificate verification, which Prism
    /// deployments with self-signed certificates need.
    pub fn new(insecure: bool) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .user_agent(concat!("prism-dr/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(insecure)
            .build()?;

        Ok(Self { client })
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post<B, T>(
        &self,
        url: &str,
        credentials: &Credentials,
        body: &B,
    ) -> Result<T, UpstreamError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {}", url);

        let request = credentials.apply(self.client.post(url)).json(body);
        let response = request.send().await?;

        let status = response.status();
        let response_body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            let sanitized = sanitize_for_log(&response_body);
            tracing::error!("API error: {} - {}", status, sanitized);
            return Err(UpstreamError::Status {
                status,
                body: sanitized,
            });
        }

        Ok(serde_json::from_str(&response_body)?)
    }
}
