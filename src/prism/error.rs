//! Upstream errors
//!
//! The single error kind that crosses the data-source read boundary.

use reqwest::StatusCode;

/// Failure of a call to the Prism API
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("failed to build API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx response; `body` is already sanitized for display
    #[error("API request failed: {status}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl UpstreamError {
    /// HTTP status of the failed call, when the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Request(err) => err.status(),
            _ => None,
        }
    }
}

/// Format an upstream error for display
/// Security: keeps messages generic so API internals are not echoed to users
pub fn format_upstream_error(error: &UpstreamError) -> String {
    if let Some(status) = error.status() {
        return match status.as_u16() {
            401 => "Authentication failed. Check NUTANIX_USERNAME and NUTANIX_PASSWORD.".to_string(),
            403 => "Permission denied. The user lacks access to protection rules.".to_string(),
            404 => "Endpoint not found. Is this a Prism Central address?".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            400 => "Invalid request. Check your parameters.".to_string(),
            500 | 502 | 503 => {
                "Prism service temporarily unavailable. Please try again.".to_string()
            }
            _ => "Request failed. Check your network connection and try again.".to_string(),
        };
    }

    match error {
        UpstreamError::Url(_) => "Invalid endpoint. Check NUTANIX_ENDPOINT.".to_string(),
        UpstreamError::Decode(_) => "Unexpected response from Prism API.".to_string(),
        _ => {
            let error_str = error.to_string();
            let sanitized = error_str
                .chars()
                .filter(|c| c.is_ascii_graphic() || *c == ' ')
                .take(80)
                .collect::<String>();

            if sanitized.len() < error_str.len() {
                format!("{}...", sanitized)
            } else {
                sanitized
            }
        }
    }
}
