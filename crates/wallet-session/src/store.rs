/*
[INPUT]:  Mutations issued by the session controller
[OUTPUT]: Observable SessionState snapshots via `watch`, derived SessionStatus
[POS]:    State layer - single source of truth for wallet/session state
[UPDATE]: When session fields, invariants, or derived states change
*/

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::adapter::WalletAdapter;
use crate::registry::WalletDescriptor;

/// Derived lifecycle state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    /// User was sent to a wallet's installation page
    AwaitingProviderInstall,
    Connecting,
    ConnectedUnauthenticated,
    ConnectedAuthenticated,
    /// Session still valid, transport down
    AuthenticatedDisconnected,
    /// Last attempt failed; `auth_error` holds the message
    Error,
}

/// Wallet/session state observed by the presentation layer
#[derive(Clone, Default, Serialize)]
pub struct SessionState {
    pub is_initialized: bool,
    pub is_connecting: bool,
    pub is_connected: bool,
    pub is_authenticated: bool,
    pub is_modal_open: bool,
    #[serde(skip)]
    pub active_adapter: Option<Arc<dyn WalletAdapter>>,
    pub public_key: Option<String>,
    pub wallet_name: Option<String>,
    pub auth_error: Option<String>,
    pub install_prompt: Option<String>,
    pub connected_at: Option<DateTime<Utc>>,
    pub wallets: Vec<WalletDescriptor>,
}

impl SessionState {
    /// Derive the lifecycle state.
    ///
    /// A live connection wins over a recorded error. Once disconnected, a
    /// failed attempt reports `Error` even if the authenticated session
    /// survives; `is_authenticated` still tells the two apart.
    pub fn status(&self) -> SessionStatus {
        if self.is_connecting {
            SessionStatus::Connecting
        } else if self.is_connected && self.is_authenticated {
            SessionStatus::ConnectedAuthenticated
        } else if self.is_connected {
            SessionStatus::ConnectedUnauthenticated
        } else if self.auth_error.is_some() {
            SessionStatus::Error
        } else if self.is_authenticated {
            SessionStatus::AuthenticatedDisconnected
        } else if self.install_prompt.is_some() {
            SessionStatus::AwaitingProviderInstall
        } else {
            SessionStatus::Idle
        }
    }

    /// Check the identity/connection invariants
    pub fn is_consistent(&self) -> bool {
        let identity_matches = self.public_key.is_some() == self.is_connected
            && self.wallet_name.is_some() == self.is_connected
            && self.connected_at.is_some() == self.is_connected;
        let adapter_backs_connection = self.active_adapter.is_some() || !self.is_connected;
        identity_matches && adapter_backs_connection
    }

    /// Name of the adapter the controller currently owns
    pub fn active_wallet(&self) -> Option<&str> {
        self.active_adapter.as_ref().map(|adapter| adapter.name())
    }

    fn clear_transport(&mut self) {
        self.is_connected = false;
        self.active_adapter = None;
        self.public_key = None;
        self.wallet_name = None;
        self.connected_at = None;
    }

    fn set_connected(&mut self, adapter: Arc<dyn WalletAdapter>, public_key: String, authenticate: bool) {
        self.is_connected = true;
        self.wallet_name = Some(adapter.name().to_string());
        self.active_adapter = Some(adapter);
        self.public_key = Some(public_key);
        self.connected_at = Some(Utc::now());
        if authenticate {
            self.is_authenticated = true;
        }
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("status", &self.status())
            .field("is_initialized", &self.is_initialized)
            .field("is_connecting", &self.is_connecting)
            .field("is_connected", &self.is_connected)
            .field("is_authenticated", &self.is_authenticated)
            .field("is_modal_open", &self.is_modal_open)
            .field("active_adapter", &self.active_wallet())
            .field("public_key", &self.public_key)
            .field("wallet_name", &self.wallet_name)
            .field("auth_error", &self.auth_error)
            .field("install_prompt", &self.install_prompt)
            .field("wallets", &self.wallets)
            .finish()
    }
}

/// Observable container for [`SessionState`].
///
/// Reads are open to everyone; writes are crate-private and each one is a
/// single `send_modify`, so observers never see a half-applied mutation.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self { tx }
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Receiver notified after every mutation
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        self.tx.borrow().status()
    }

    pub fn active_adapter(&self) -> Option<Arc<dyn WalletAdapter>> {
        self.tx.borrow().active_adapter.clone()
    }

    pub(crate) fn mark_initialized(&self, wallets: Vec<WalletDescriptor>) {
        self.tx.send_modify(|state| {
            state.wallets = wallets;
            state.is_initialized = true;
        });
    }

    /// Atomically claim the single connect slot.
    ///
    /// Returns false, leaving state untouched, if an attempt is already in flight.
    pub(crate) fn try_begin_connect(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if state.is_connecting {
                return false;
            }
            state.is_connecting = true;
            state.auth_error = None;
            state.install_prompt = None;
            true
        })
    }

    /// Record that the user is being sent to install `wallet`.
    ///
    /// Returns false, leaving state untouched, while an attempt owns the
    /// connect slot.
    pub(crate) fn mark_install_prompt(&self, wallet: &str) -> bool {
        self.tx.send_if_modified(|state| {
            if state.is_connecting {
                return false;
            }
            state.install_prompt = Some(wallet.to_string());
            true
        })
    }

    pub(crate) fn mark_connected(
        &self,
        adapter: Arc<dyn WalletAdapter>,
        public_key: String,
        authenticate: bool,
    ) {
        self.tx.send_modify(|state| {
            state.set_connected(adapter, public_key, authenticate);
        });
    }

    /// Drop the transport fields; optionally end the authenticated session too
    pub(crate) fn clear_transport(&self, end_session: bool) {
        self.tx.send_modify(|state| {
            state.clear_transport();
            if end_session {
                state.is_authenticated = false;
            }
        });
    }

    pub(crate) fn record_error(&self, message: &str) {
        self.tx.send_modify(|state| {
            state.is_connecting = false;
            state.auth_error = Some(message.to_string());
        });
    }

    /// Connect call resolved: take ownership of the adapter and close the modal.
    ///
    /// If the adapter already reports an identity that no `connect` event
    /// delivered, the connection is reconciled from it.
    pub(crate) fn complete_connect(&self, adapter: Arc<dyn WalletAdapter>, authenticate: bool) {
        let reported_key = adapter.public_key();
        self.tx.send_modify(|state| {
            match reported_key {
                Some(public_key) if !state.is_connected => {
                    state.set_connected(adapter, public_key, authenticate);
                }
                _ => state.active_adapter = Some(adapter),
            }
            state.is_connecting = false;
            state.is_modal_open = false;
        });
    }

    /// Connect call failed: release everything the attempt touched.
    ///
    /// An error message already recorded during the attempt is kept.
    pub(crate) fn abort_connect(&self, message: Option<String>) {
        self.tx.send_modify(|state| {
            state.is_connecting = false;
            state.clear_transport();
            if state.auth_error.is_none() {
                state.auth_error = message;
            }
        });
    }

    pub(crate) fn set_modal_open(&self, open: bool) {
        self.tx.send_if_modified(|state| {
            let changed = state.is_modal_open != open;
            state.is_modal_open = open;
            changed
        });
    }

    pub(crate) fn end_session(&self) {
        self.tx.send_modify(|state| {
            state.is_authenticated = false;
            state.auth_error = None;
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MockWalletAdapter;

    fn phantom() -> Arc<dyn WalletAdapter> {
        Arc::new(MockWalletAdapter::new("Phantom", "ABC123"))
    }

    #[test]
    fn test_default_state_is_idle() {
        let store = SessionStore::new();
        let state = store.snapshot();
        assert_eq!(state.status(), SessionStatus::Idle);
        assert!(state.is_consistent());
        assert!(!state.is_initialized);
        assert!(state.wallets.is_empty());
    }

    #[test]
    fn test_begin_connect_is_exclusive() {
        let store = SessionStore::new();
        assert!(store.try_begin_connect());
        assert!(!store.try_begin_connect());
        assert_eq!(store.status(), SessionStatus::Connecting);

        store.abort_connect(None);
        assert!(store.try_begin_connect());
    }

    #[test]
    fn test_connected_then_transport_drop_keeps_session() {
        let store = SessionStore::new();
        store.mark_connected(phantom(), "ABC123".to_string(), true);
        assert_eq!(store.status(), SessionStatus::ConnectedAuthenticated);
        assert!(store.snapshot().is_consistent());

        store.clear_transport(false);
        let state = store.snapshot();
        assert_eq!(state.status(), SessionStatus::AuthenticatedDisconnected);
        assert!(state.public_key.is_none());
        assert!(state.is_consistent());

        store.end_session();
        assert_eq!(store.status(), SessionStatus::Idle);
    }

    #[test]
    fn test_abort_keeps_first_error() {
        let store = SessionStore::new();
        assert!(store.try_begin_connect());
        store.record_error("User rejected");
        store.abort_connect(Some("Connection request rejected in Phantom".to_string()));

        let state = store.snapshot();
        assert_eq!(state.auth_error.as_deref(), Some("User rejected"));
        assert_eq!(state.status(), SessionStatus::Error);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_complete_connect_reconciles_reported_identity() {
        let store = SessionStore::new();
        let adapter = MockWalletAdapter::new("Solflare", "XYZ");
        adapter.emit(crate::types::AdapterEvent::connect("XYZ"));
        let adapter: Arc<dyn WalletAdapter> = Arc::new(adapter);

        assert!(store.try_begin_connect());
        store.complete_connect(adapter, false);

        let state = store.snapshot();
        assert_eq!(state.status(), SessionStatus::ConnectedUnauthenticated);
        assert_eq!(state.public_key.as_deref(), Some("XYZ"));
        assert_eq!(state.wallet_name.as_deref(), Some("Solflare"));
        assert!(state.is_consistent());
    }

    #[tokio::test]
    async fn test_observers_see_whole_mutations() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.mark_connected(phantom(), "ABC123".to_string(), true);
        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert!(seen.is_connected);
        assert_eq!(seen.public_key.as_deref(), Some("ABC123"));
        assert_eq!(seen.wallet_name.as_deref(), Some("Phantom"));
    }

    #[test]
    fn test_install_prompt_status() {
        let store = SessionStore::new();
        assert!(store.mark_install_prompt("Solflare"));
        assert_eq!(store.status(), SessionStatus::AwaitingProviderInstall);
        assert!(store.try_begin_connect());
        assert!(store.snapshot().install_prompt.is_none());
    }

    #[test]
    fn test_install_prompt_ignored_while_connecting() {
        let store = SessionStore::new();
        assert!(store.try_begin_connect());
        assert!(!store.mark_install_prompt("Solflare"));

        let state = store.snapshot();
        assert!(state.is_connecting);
        assert!(state.install_prompt.is_none());
        assert!(!store.try_begin_connect());
    }

    #[test]
    fn test_failed_reconnect_reports_error_over_kept_session() {
        let store = SessionStore::new();
        store.mark_connected(phantom(), "ABC123".to_string(), true);
        store.clear_transport(false);
        assert_eq!(store.status(), SessionStatus::AuthenticatedDisconnected);

        assert!(store.try_begin_connect());
        store.abort_connect(Some("Phantom is locked".to_string()));
        let state = store.snapshot();
        assert!(state.is_authenticated);
        assert_eq!(state.status(), SessionStatus::Error);

        store.end_session();
        assert_eq!(store.status(), SessionStatus::Idle);
    }
}
