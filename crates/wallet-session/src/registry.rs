/*
[INPUT]:  Wallet source (host discovery) and execution context
[OUTPUT]: Wallet descriptors ordered by installation readiness
[POS]:    Registry layer - enumerates and ranks wallet providers
[UPDATE]: When discovery sources or ranking rules change
*/

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::adapter::WalletAdapter;
use crate::environment::ExecutionContext;
use crate::types::WalletReadyState;

pub const PHANTOM_INSTALL_URL: &str = "https://phantom.app/download";
pub const SOLFLARE_INSTALL_URL: &str = "https://solflare.com/download";

/// Wallet brands with a known installation page
pub const KNOWN_INSTALL_URLS: &[(&str, &str)] = &[
    ("Phantom", PHANTOM_INSTALL_URL),
    ("Solflare", SOLFLARE_INSTALL_URL),
];

/// A discovered wallet provider
#[derive(Clone, Serialize)]
pub struct WalletDescriptor {
    pub name: String,
    pub ready_state: WalletReadyState,
    #[serde(skip)]
    pub adapter: Arc<dyn WalletAdapter>,
}

impl WalletDescriptor {
    /// Snapshot name and readiness from the adapter
    pub fn from_adapter(adapter: Arc<dyn WalletAdapter>) -> Self {
        Self {
            name: adapter.name().to_string(),
            ready_state: adapter.ready_state(),
            adapter,
        }
    }
}

impl fmt::Debug for WalletDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletDescriptor")
            .field("name", &self.name)
            .field("ready_state", &self.ready_state)
            .finish_non_exhaustive()
    }
}

/// Host-side enumeration of wallet providers
pub trait WalletSource: Send + Sync {
    fn available_wallets(&self) -> Vec<WalletDescriptor>;
}

/// Fixed set of adapters, reported in insertion order
#[derive(Default, Clone)]
pub struct StaticWalletSource {
    adapters: Vec<Arc<dyn WalletAdapter>>,
}

impl StaticWalletSource {
    pub fn new(adapters: Vec<Arc<dyn WalletAdapter>>) -> Self {
        Self { adapters }
    }
}

impl WalletSource for StaticWalletSource {
    fn available_wallets(&self) -> Vec<WalletDescriptor> {
        self.adapters
            .iter()
            .cloned()
            .map(WalletDescriptor::from_adapter)
            .collect()
    }
}

/// Discovers and orders wallet providers
#[derive(Clone)]
pub struct WalletRegistry {
    source: Arc<dyn WalletSource>,
    context: ExecutionContext,
}

impl WalletRegistry {
    pub fn new(source: Arc<dyn WalletSource>, context: ExecutionContext) -> Self {
        Self { source, context }
    }

    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    /// Query the host for wallet providers.
    ///
    /// Headless contexts have no providers, so this returns an empty list.
    pub fn discover(&self) -> Vec<WalletDescriptor> {
        if !self.context.is_interactive() {
            debug!("headless context; skipping wallet discovery");
            return Vec::new();
        }
        self.source.available_wallets()
    }

    /// Installed first, loadable second, everything else last.
    /// Ties keep discovery order.
    pub fn rank(mut descriptors: Vec<WalletDescriptor>) -> Vec<WalletDescriptor> {
        descriptors.sort_by_key(|descriptor| descriptor.ready_state.priority());
        descriptors
    }

    /// Discover and rank in one step
    pub fn refresh(&self) -> Vec<WalletDescriptor> {
        Self::rank(self.discover())
    }
}

impl fmt::Debug for WalletRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRegistry")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
