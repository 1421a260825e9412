//! Configuration Management
//!
//! Handles persistent connection settings for prism-dr and resolves them
//! against environment variables and CLI flags.

use crate::prism::auth::{self, Credentials};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Prism Central port
pub const DEFAULT_PORT: u16 = 9440;

pub const ENDPOINT_ENV: &str = "NUTANIX_ENDPOINT";
pub const PORT_ENV: &str = "NUTANIX_PORT";
pub const INSECURE_ENV: &str = "NUTANIX_INSECURE";

/// User configuration
///
/// The password is deliberately absent; it only comes from the
/// environment or the command line.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Prism Central host or URL
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: Option<bool>,
}

/// Command-line overrides, highest precedence
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: bool,
}

/// Fully resolved connection settings
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub endpoint: String,
    pub port: u16,
    pub credentials: Credentials,
    pub insecure: bool,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("prism-dr").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Resolve settings: CLI > env > config file > default
    pub fn resolve(&self, overrides: &Overrides) -> Result<ConnectionConfig> {
        self.resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup
    pub fn resolve_with<F>(&self, overrides: &Overrides, env: F) -> Result<ConnectionConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.is_empty());

        let endpoint = overrides
            .endpoint
            .clone()
            .or_else(|| lookup(ENDPOINT_ENV))
            .or_else(|| self.endpoint.clone())
            .context("No Prism endpoint configured. Set NUTANIX_ENDPOINT or use --endpoint")?;

        let port = match (overrides.port, lookup(PORT_ENV)) {
            (Some(port), _) => port,
            (None, Some(raw)) => raw
                .parse()
                .with_context(|| format!("Invalid {}: {}", PORT_ENV, raw))?,
            (None, None) => self.port.unwrap_or(DEFAULT_PORT),
        };

        let username = overrides
            .username
            .clone()
            .or_else(|| lookup(auth::USERNAME_ENV))
            .or_else(|| self.username.clone())
            .context("No Prism username configured. Set NUTANIX_USERNAME or use --username")?;

        let password = overrides
            .password
            .clone()
            .or_else(|| lookup(auth::PASSWORD_ENV))
            .context("No Prism password configured. Set NUTANIX_PASSWORD or use --password")?;

        let insecure = overrides.insecure
            || lookup(INSECURE_ENV)
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or_else(|| self.insecure.unwrap_or(false));

        Ok(ConnectionConfig {
            endpoint,
            port,
            credentials: Credentials::new(username, password),
            insecure,
        })
    }

    /// Remember the endpoint and user name of a successful read
    pub fn remember(&mut self, connection: &ConnectionConfig) -> Result<()> {
        self.endpoint = Some(connection.endpoint.clone());
        self.port = Some(connection.port);
        self.username = Some(connection.credentials.username.clone());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_fills_missing_settings() {
        let config = Config::default();
        let resolved = config
            .resolve_with(
                &Overrides::default(),
                env_of(&[
                    ("NUTANIX_ENDPOINT", "10.0.0.5"),
                    ("NUTANIX_USERNAME", "admin"),
                    ("NUTANIX_PASSWORD", "secret"),
                ]),
            )
            .unwrap();

        assert_eq!(resolved.endpoint, "10.0.0.5");
        assert_eq!(resolved.port, DEFAULT_PORT);
        assert_eq!(resolved.credentials.username, "admin");
        assert_eq!(resolved.credentials.password(), "secret");
        assert!(!resolved.insecure);
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let config = Config {
            endpoint: Some("file-host".to_string()),
            port: Some(9000),
            username: Some("file-user".to_string()),
            insecure: Some(false),
        };
        let overrides = Overrides {
            endpoint: Some("cli-host".to_string()),
            ..Default::default()
        };

        let resolved = config
            .resolve_with(
                &overrides,
                env_of(&[
                    ("NUTANIX_ENDPOINT", "env-host"),
                    ("NUTANIX_USERNAME", "env-user"),
                    ("NUTANIX_PASSWORD", "secret"),
                    ("NUTANIX_INSECURE", "true"),
                ]),
            )
            .unwrap();

        assert_eq!(resolved.endpoint, "cli-host");
        assert_eq!(resolved.port, 9000);
        assert_eq!(resolved.credentials.username, "env-user");
        assert!(resolved.insecure);
    }

    #[test]
    fn test_missing_password_is_an_error() {
        let config = Config {
            endpoint: Some("host".to_string()),
            username: Some("admin".to_string()),
            ..Default::default()
        };
        let err = config
            .resolve_with(&Overrides::default(), env_of(&[]))
            .unwrap_err();
        assert!(err.to_string().contains("NUTANIX_PASSWORD"));
    }

    #[test]
    fn test_invalid_port_env_is_an_error() {
        let err = Config::default()
            .resolve_with(
                &Overrides::default(),
                env_of(&[
                    ("NUTANIX_ENDPOINT", "host"),
                    ("NUTANIX_PORT", "not-a-port"),
                    ("NUTANIX_USERNAME", "admin"),
                    ("NUTANIX_PASSWORD", "secret"),
                ]),
            )
            .unwrap_err();
        assert!(err.to_string().contains("NUTANIX_PORT"));
    }

    #[test]
    fn test_config_never_serializes_password() {
        let json = serde_json::to_string(&Config {
            endpoint: Some("host".to_string()),
            port: None,
            username: Some("admin".to_string()),
            insecure: None,
        })
        .unwrap();
        assert!(!json.contains("password"));
    }
}
