/*
[INPUT]:  Test scenarios needing a controller over scripted wallets
[OUTPUT]: Shared fixtures: mock wallets, controller harness
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for wallet-session tests

use std::sync::Arc;

use wallet_session::{
    ExecutionContext, MockWalletAdapter, RecordingNavigator, SessionConfig, SessionController,
    SessionStore, StaticWalletSource, WalletAdapter, WalletReadyState, WalletRegistry,
};

pub struct Harness {
    pub controller: SessionController,
    pub navigator: Arc<RecordingNavigator>,
}

/// Build an initialized controller over the given wallets
pub fn harness(adapters: &[Arc<MockWalletAdapter>]) -> Harness {
    harness_with(adapters, SessionConfig::default(), ExecutionContext::Interactive)
}

pub fn harness_with(
    adapters: &[Arc<MockWalletAdapter>],
    config: SessionConfig,
    context: ExecutionContext,
) -> Harness {
    let adapters: Vec<Arc<dyn WalletAdapter>> = adapters
        .iter()
        .map(|adapter| adapter.clone() as Arc<dyn WalletAdapter>)
        .collect();
    let registry = WalletRegistry::new(Arc::new(StaticWalletSource::new(adapters)), context);
    let navigator = Arc::new(RecordingNavigator::new());
    let controller = SessionController::new(
        Arc::new(SessionStore::new()),
        registry,
        navigator.clone(),
        config,
    );
    controller.initialize();
    Harness {
        controller,
        navigator,
    }
}

/// Installed Phantom wallet that approves with "ABC123"
pub fn phantom() -> Arc<MockWalletAdapter> {
    Arc::new(MockWalletAdapter::new("Phantom", "ABC123"))
}

/// Installed Solflare wallet that approves with "SOL456"
#[allow(dead_code)]
pub fn solflare() -> Arc<MockWalletAdapter> {
    Arc::new(MockWalletAdapter::new("Solflare", "SOL456"))
}

#[allow(dead_code)]
pub fn not_detected(name: &str) -> Arc<MockWalletAdapter> {
    Arc::new(MockWalletAdapter::new(name, "UNUSED").with_ready_state(WalletReadyState::NotDetected))
}
