/*
[INPUT]:  YAML configuration (file or string)
[OUTPUT]: Validated session controller configuration
[POS]:    Configuration layer - connect timeout, disconnect policy, install pages
[UPDATE]: When adding new configuration options
*/

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, WalletError};
use crate::registry::KNOWN_INSTALL_URLS;
use crate::types::DisconnectPolicy;

/// Configuration for the session controller
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Upper bound for a single adapter connect call
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Effect of a transport drop on the authenticated session
    #[serde(default)]
    pub disconnect_policy: DisconnectPolicy,
    /// Mark the session authenticated when the adapter reports `connect`
    #[serde(default = "default_authenticate_on_connect")]
    pub authenticate_on_connect: bool,
    /// Extra or overriding installation pages, keyed by wallet name
    #[serde(default)]
    pub install_urls: BTreeMap<String, Url>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            disconnect_policy: DisconnectPolicy::default(),
            authenticate_on_connect: default_authenticate_on_connect(),
            install_urls: BTreeMap::new(),
        }
    }
}

fn default_connect_timeout_ms() -> u64 {
    30_000
}

fn default_authenticate_on_connect() -> bool {
    true
}

impl SessionConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout_ms == 0 {
            return Err(WalletError::Config(
                "connect_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Installation page for a wallet brand, configured entries first
    pub fn install_url(&self, wallet: &str) -> Option<Url> {
        if let Some(url) = self.install_urls.get(wallet) {
            return Some(url.clone());
        }
        KNOWN_INSTALL_URLS
            .iter()
            .find(|(name, _)| *name == wallet)
            .and_then(|(_, url)| Url::parse(url).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = SessionConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
        assert_eq!(config.disconnect_policy, DisconnectPolicy::KeepSession);
        assert!(config.authenticate_on_connect);
        assert!(config.install_urls.is_empty());
    }

    #[test]
    fn test_known_install_urls() {
        let config = SessionConfig::default();
        assert_eq!(
            config.install_url("Phantom").unwrap().as_str(),
            "https://phantom.app/download"
        );
        assert_eq!(
            config.install_url("Solflare").unwrap().as_str(),
            "https://solflare.com/download"
        );
        assert!(config.install_url("Backpack").is_none());
    }

    #[test]
    fn test_configured_install_url_overrides() {
        let yaml = r#"
connect_timeout_ms: 5000
disconnect_policy: end_session
install_urls:
  Phantom: https://example.com/phantom
  Backpack: https://backpack.app/downloads
"#;
        let config = SessionConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.connect_timeout_ms, 5000);
        assert!(config.disconnect_policy.ends_session());
        assert_eq!(
            config.install_url("Phantom").unwrap().as_str(),
            "https://example.com/phantom"
        );
        assert_eq!(
            config.install_url("Backpack").unwrap().as_str(),
            "https://backpack.app/downloads"
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = SessionConfig::from_yaml_str("connect_timeout_ms: 0").unwrap_err();
        assert!(matches!(err, WalletError::Config(_)));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = SessionConfig::from_yaml_str("install_urls:\n  Phantom: not a url\n").unwrap_err();
        assert!(matches!(err, WalletError::Yaml(_)));
    }
}
