/*
[INPUT]:  YAML simulation file
[OUTPUT]: Session configuration plus scripted wallets and a ready controller
[POS]:    Configuration layer - simulation setup
[UPDATE]: When adding new simulated wallet options
*/

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use wallet_session::{
    ConnectBehavior, ExecutionContext, MockWalletAdapter, Navigator, SessionConfig,
    SessionController, SessionStore, StaticWalletSource, WalletAdapter, WalletReadyState,
    WalletRegistry,
};

/// Top-level configuration for a simulated session
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Controller settings
    #[serde(default)]
    pub session: SessionConfig,
    /// Wallets the simulated host reports, in discovery order
    pub wallets: Vec<SimulatedWallet>,
}

/// One scripted wallet provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulatedWallet {
    pub name: String,
    #[serde(default = "default_ready_state")]
    pub ready_state: WalletReadyState,
    /// Account reported on approval
    #[serde(default = "default_public_key")]
    pub public_key: String,
    #[serde(default)]
    pub connect: ConnectOutcome,
    /// Message used by `reject` and `fail`
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub connect_delay_ms: Option<u64>,
    /// Make `disconnect` fail with this message
    #[serde(default)]
    pub disconnect_error: Option<String>,
}

/// Scripted result of a connect call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectOutcome {
    #[default]
    Approve,
    Reject,
    Fail,
    Hang,
}

fn default_ready_state() -> WalletReadyState {
    WalletReadyState::Installed
}

fn default_public_key() -> String {
    "11111111111111111111111111111111".to_string()
}

impl SimulatedWallet {
    pub fn behavior(&self) -> ConnectBehavior {
        let message = || {
            self.message
                .clone()
                .unwrap_or_else(|| format!("{} declined", self.name))
        };
        match self.connect {
            ConnectOutcome::Approve => ConnectBehavior::Approve,
            ConnectOutcome::Reject => ConnectBehavior::Reject(message()),
            ConnectOutcome::Fail => ConnectBehavior::Fail(message()),
            ConnectOutcome::Hang => ConnectBehavior::Hang,
        }
    }

    pub fn to_adapter(&self) -> MockWalletAdapter {
        let mut adapter = MockWalletAdapter::new(&self.name, &self.public_key)
            .with_ready_state(self.ready_state)
            .with_behavior(self.behavior());
        if let Some(delay) = self.connect_delay_ms {
            adapter = adapter.with_connect_delay(Duration::from_millis(delay));
        }
        if let Some(message) = &self.disconnect_error {
            adapter = adapter.with_disconnect_failure(message);
        }
        adapter
    }
}

impl SimulationConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.session.validate().context("invalid session settings")?;
        for (index, wallet) in self.wallets.iter().enumerate() {
            if wallet.name.trim().is_empty() {
                bail!("wallet #{index} has an empty name");
            }
            if self.wallets[..index].iter().any(|other| other.name == wallet.name) {
                bail!("duplicate wallet name: {}", wallet.name);
            }
        }
        Ok(())
    }

    /// Build a controller over the scripted wallets
    pub fn build_controller(
        &self,
        context: ExecutionContext,
        navigator: Arc<dyn Navigator>,
    ) -> SessionController {
        let adapters: Vec<Arc<dyn WalletAdapter>> = self
            .wallets
            .iter()
            .map(|wallet| Arc::new(wallet.to_adapter()) as Arc<dyn WalletAdapter>)
            .collect();
        let registry = WalletRegistry::new(Arc::new(StaticWalletSource::new(adapters)), context);
        SessionController::new(
            Arc::new(SessionStore::new()),
            registry,
            navigator,
            self.session.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulation() {
        let yaml = r#"
wallets:
  - name: Phantom
    public_key: ABC123
  - name: Solflare
    ready_state: not_detected
  - name: Ledger
    connect: fail
"#;
        let config = SimulationConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.session.connect_timeout_ms, 30_000);
        assert_eq!(config.wallets.len(), 3);
        assert_eq!(config.wallets[0].behavior(), ConnectBehavior::Approve);
        assert_eq!(config.wallets[1].ready_state, WalletReadyState::NotDetected);
        assert_eq!(
            config.wallets[2].behavior(),
            ConnectBehavior::Fail("Ledger declined".to_string())
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let yaml = "wallets:\n  - name: Phantom\n  - name: Phantom\n";
        let err = SimulationConfig::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate wallet name"));
    }

    #[test]
    fn test_load_fixture_from_path() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/phantom_session.yaml");
        let config = SimulationConfig::from_file(&path).unwrap();
        assert!(config.wallets.iter().any(|wallet| wallet.name == "Phantom"));

        let err = SimulationConfig::from_file(path.with_file_name("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("missing.yaml"));
    }
}
