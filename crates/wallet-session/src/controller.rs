/*
[INPUT]:  User intents (initialize, select wallet, disconnect, modal) and adapter events
[OUTPUT]: Session state transitions written to the SessionStore
[POS]:    Controller layer - orchestrates the wallet connection lifecycle
[UPDATE]: When transition rules, failure handling, or listener ownership change
*/

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::adapter::{EventHandler, Subscription, WalletAdapter};
use crate::config::SessionConfig;
use crate::environment::Navigator;
use crate::error::{Result, WalletError};
use crate::registry::{WalletDescriptor, WalletRegistry};
use crate::store::{SessionState, SessionStatus, SessionStore};
use crate::types::{AdapterEvent, WalletReadyState};

/// Listeners attached to the adapter the controller currently owns
struct ActiveListeners {
    wallet: String,
    subscription: Subscription,
}

/// Orchestrates connect/disconnect for a single wallet session.
///
/// At most one connect attempt is in flight, and at most one adapter has
/// listeners attached. The store is injected so callers (and tests) decide
/// its lifetime.
pub struct SessionController {
    store: Arc<SessionStore>,
    registry: WalletRegistry,
    navigator: Arc<dyn Navigator>,
    config: SessionConfig,
    listeners: Mutex<Option<ActiveListeners>>,
}

impl SessionController {
    pub fn new(
        store: Arc<SessionStore>,
        registry: WalletRegistry,
        navigator: Arc<dyn Navigator>,
        config: SessionConfig,
    ) -> Self {
        Self {
            store,
            registry,
            navigator,
            config,
            listeners: Mutex::new(None),
        }
    }

    /// Read access to the session state
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        self.store.snapshot()
    }

    pub fn status(&self) -> SessionStatus {
        self.store.status()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Populate the wallet list once.
    ///
    /// Headless contexts leave the state untouched, so a later call from an
    /// interactive context can still initialize.
    pub fn initialize(&self) {
        if self.store.snapshot().is_initialized {
            return;
        }
        if !self.registry.context().is_interactive() {
            debug!("headless context; wallet initialization skipped");
            return;
        }

        let wallets = self.registry.refresh();
        info!(wallet_count = wallets.len(), "wallet registry initialized");
        self.store.mark_initialized(wallets);
    }

    /// Look a discovered wallet up by name and select it
    pub async fn select_wallet_by_name(&self, name: &str) -> Result<()> {
        let descriptor = self
            .store
            .snapshot()
            .wallets
            .into_iter()
            .find(|wallet| wallet.name == name)
            .ok_or_else(|| WalletError::UnknownWallet(name.to_string()))?;
        self.select_wallet(&descriptor).await
    }

    /// Begin connecting to a wallet.
    ///
    /// Not-detected wallets are never connected; the user is sent to the
    /// installation page instead. Calls made while an attempt is in flight
    /// are dropped, not-detected ones included. A failed or timed-out connect call leaves the state reset
    /// and is returned to the caller.
    pub async fn select_wallet(&self, descriptor: &WalletDescriptor) -> Result<()> {
        let wallet = descriptor.name.as_str();

        if descriptor.ready_state == WalletReadyState::NotDetected {
            if !self.store.mark_install_prompt(wallet) {
                debug!(wallet, "connect already in flight; ignoring install redirect");
                return Ok(());
            }
            match self.config.install_url(wallet) {
                Some(url) => {
                    info!(wallet, url = %url, "wallet not detected; redirecting to install page");
                    self.navigator.open(&url);
                }
                None => debug!(wallet, "wallet not detected and no install page known"),
            }
            return Ok(());
        }

        if !self.store.try_begin_connect() {
            debug!(wallet, "connect already in flight; ignoring selection");
            return Ok(());
        }
        let mut attempt = ConnectAttempt::new(&self.store);
        let attempt_id = Uuid::new_v4();

        self.replace_active(wallet).await;

        let adapter = descriptor.adapter.clone();
        let subscription = adapter.subscribe(self.event_handler(&adapter));
        info!(wallet, %attempt_id, "connecting wallet");

        let timeout = self.config.connect_timeout();
        let outcome = match tokio::time::timeout(timeout, adapter.connect()).await {
            Ok(result) => result,
            Err(_) => Err(WalletError::Timeout {
                wallet: wallet.to_string(),
                duration_ms: self.config.connect_timeout_ms,
            }),
        };

        match outcome {
            Ok(()) => {
                self.store
                    .complete_connect(adapter, self.config.authenticate_on_connect);
                attempt.finish();
                *self.lock_listeners() = Some(ActiveListeners {
                    wallet: wallet.to_string(),
                    subscription,
                });
                let state = self.store.snapshot();
                info!(
                    wallet,
                    %attempt_id,
                    connected = state.is_connected,
                    public_key = state.public_key.as_deref().unwrap_or(""),
                    "wallet connect resolved"
                );
                Ok(())
            }
            Err(err) => {
                drop(subscription);
                self.store.abort_connect(Some(err.to_string()));
                attempt.finish();
                warn!(wallet, %attempt_id, error = %err, "wallet connect failed");
                Err(err)
            }
        }
    }

    /// Disconnect the active adapter.
    ///
    /// State is cleared and listeners are detached whether or not the adapter
    /// call succeeds; its failure is returned afterwards.
    pub async fn disconnect(&self) -> Result<()> {
        let Some(adapter) = self.store.active_adapter() else {
            let dormant = self.lock_listeners().take();
            if let Some(dormant) = dormant {
                debug!(wallet = %dormant.wallet, "releasing listeners of disconnected wallet");
            }
            return Ok(());
        };

        let wallet = adapter.name().to_string();
        let result = adapter.disconnect().await;

        self.store.clear_transport(true);
        self.lock_listeners().take();

        match result {
            Ok(()) => {
                info!(wallet = %wallet, "wallet disconnected");
                Ok(())
            }
            Err(err) => {
                warn!(wallet = %wallet, error = %err, "wallet disconnect failed; state cleared anyway");
                Err(err)
            }
        }
    }

    /// Leave the authenticated session without touching the transport
    pub fn end_session(&self) {
        self.store.end_session();
        info!("authenticated session ended");
    }

    pub fn open_modal(&self) {
        self.store.set_modal_open(true);
    }

    pub fn close_modal(&self) {
        self.store.set_modal_open(false);
    }

    /// Detach the previous adapter's listeners before a new attempt subscribes.
    ///
    /// A different wallet that is still connected is disconnected best-effort.
    async fn replace_active(&self, next_wallet: &str) {
        let previous = self.lock_listeners().take();
        let Some(previous) = previous else {
            return;
        };
        drop(previous.subscription);

        if previous.wallet == next_wallet {
            return;
        }

        let Some(adapter) = self.store.active_adapter() else {
            return;
        };
        if adapter.name() != previous.wallet {
            return;
        }

        self.store.clear_transport(false);
        if let Err(err) = adapter.disconnect().await {
            warn!(wallet = %previous.wallet, error = %err, "failed to disconnect replaced wallet");
        } else {
            debug!(wallet = %previous.wallet, next = next_wallet, "replaced wallet disconnected");
        }
    }

    fn event_handler(&self, adapter: &Arc<dyn WalletAdapter>) -> EventHandler {
        let store: Weak<SessionStore> = Arc::downgrade(&self.store);
        let adapter: Weak<dyn WalletAdapter> = Arc::downgrade(adapter);
        let end_session = self.config.disconnect_policy.ends_session();
        let authenticate = self.config.authenticate_on_connect;

        Arc::new(move |event: &AdapterEvent| {
            let (Some(store), Some(adapter)) = (store.upgrade(), adapter.upgrade()) else {
                return;
            };
            let wallet = adapter.name().to_string();
            match event {
                AdapterEvent::Connect { public_key } => {
                    debug!(wallet = %wallet, public_key = %public_key, "adapter connected");
                    store.mark_connected(adapter, public_key.clone(), authenticate);
                }
                AdapterEvent::Disconnect => {
                    debug!(wallet = %wallet, end_session, "adapter disconnected");
                    store.clear_transport(end_session);
                }
                AdapterEvent::Error { message } => {
                    warn!(wallet = %wallet, error = %message, "adapter reported error");
                    store.record_error(message);
                }
            }
        })
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Option<ActiveListeners>> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("state", &self.store.snapshot())
            .finish_non_exhaustive()
    }
}

/// Releases the in-flight flag if `select_wallet` is dropped mid-await
struct ConnectAttempt<'a> {
    store: &'a SessionStore,
    finished: bool,
}

impl<'a> ConnectAttempt<'a> {
    fn new(store: &'a SessionStore) -> Self {
        Self {
            store,
            finished: false,
        }
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

impl Drop for ConnectAttempt<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.store.abort_connect(None);
        }
    }
}
