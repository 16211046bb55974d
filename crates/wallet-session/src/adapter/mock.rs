/*
[INPUT]:  Scripted connect/disconnect outcomes
[OUTPUT]: Deterministic WalletAdapter for tests and simulated sessions
[POS]:    Adapter layer - mock wallet implementation
[UPDATE]: When new adapter behaviors need to be simulated
*/

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::adapter::{AdapterEventEmitter, EventHandler, Subscription, WalletAdapter};
use crate::error::{Result, WalletError};
use crate::types::{AdapterEvent, WalletReadyState};

/// Outcome of [`MockWalletAdapter::connect`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectBehavior {
    /// Set the public key, emit `connect`, resolve
    Approve,
    /// Emit `error` with the message, then fail as a user rejection
    Reject(String),
    /// Fail without emitting anything
    Fail(String),
    /// Never resolve
    Hang,
}

/// Mock wallet adapter for testing
#[derive(Debug)]
pub struct MockWalletAdapter {
    name: String,
    ready_state: WalletReadyState,
    account: String,
    behavior: Mutex<ConnectBehavior>,
    connect_delay: Option<Duration>,
    disconnect_failure: Option<String>,
    public_key: Mutex<Option<String>>,
    emitter: AdapterEventEmitter,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
}

impl MockWalletAdapter {
    /// Create an installed mock wallet that approves with `account`
    pub fn new(name: &str, account: &str) -> Self {
        Self {
            name: name.to_string(),
            ready_state: WalletReadyState::Installed,
            account: account.to_string(),
            behavior: Mutex::new(ConnectBehavior::Approve),
            connect_delay: None,
            disconnect_failure: None,
            public_key: Mutex::new(None),
            emitter: AdapterEventEmitter::new(),
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_ready_state(mut self, ready_state: WalletReadyState) -> Self {
        self.ready_state = ready_state;
        self
    }

    pub fn with_behavior(self, behavior: ConnectBehavior) -> Self {
        self.set_behavior(behavior);
        self
    }

    /// Sleep before resolving `connect`
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    /// Make `disconnect` fail with the given message
    pub fn with_disconnect_failure(mut self, message: &str) -> Self {
        self.disconnect_failure = Some(message.to_string());
        self
    }

    /// Change the outcome of subsequent `connect` calls
    pub fn set_behavior(&self, behavior: ConnectBehavior) {
        *lock(&self.behavior) = behavior;
    }

    /// Simulate a wallet-originated event
    pub fn emit(&self, event: AdapterEvent) -> usize {
        match &event {
            AdapterEvent::Connect { public_key } => {
                *lock(&self.public_key) = Some(public_key.clone());
            }
            AdapterEvent::Disconnect => {
                *lock(&self.public_key) = None;
            }
            AdapterEvent::Error { .. } => {}
        }
        self.emitter.emit(event)
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.emitter.listener_count()
    }
}

#[async_trait]
impl WalletAdapter for MockWalletAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn ready_state(&self) -> WalletReadyState {
        self.ready_state
    }

    fn public_key(&self) -> Option<String> {
        lock(&self.public_key).clone()
    }

    fn subscribe(&self, handler: EventHandler) -> Subscription {
        self.emitter.on(handler)
    }

    async fn connect(&self) -> Result<()> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }

        let behavior = lock(&self.behavior).clone();
        match behavior {
            ConnectBehavior::Approve => {
                self.emit(AdapterEvent::connect(self.account.clone()));
                Ok(())
            }
            ConnectBehavior::Reject(message) => {
                self.emit(AdapterEvent::error(message));
                Err(WalletError::Rejected {
                    wallet: self.name.clone(),
                })
            }
            ConnectBehavior::Fail(message) => Err(WalletError::adapter(&self.name, message)),
            ConnectBehavior::Hang => std::future::pending().await,
        }
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.disconnect_failure {
            return Err(WalletError::adapter(&self.name, message.clone()));
        }
        self.emit(AdapterEvent::Disconnect);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_mock_approve_emits_connect() {
        let adapter = MockWalletAdapter::new("Phantom", "ABC123");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = adapter.subscribe(Arc::new(move |event: &AdapterEvent| {
            sink.lock().unwrap().push(event.clone());
        }));

        adapter.connect().await.unwrap();

        assert_eq!(adapter.connect_calls(), 1);
        assert_eq!(adapter.public_key().as_deref(), Some("ABC123"));
        assert_eq!(*seen.lock().unwrap(), vec![AdapterEvent::connect("ABC123")]);
    }

    #[tokio::test]
    async fn test_mock_reject_emits_error() {
        let adapter = MockWalletAdapter::new("Phantom", "ABC123")
            .with_behavior(ConnectBehavior::Reject("User rejected".into()));

        let err = adapter.connect().await.unwrap_err();
        assert!(err.is_user_rejection());
        assert!(adapter.public_key().is_none());
    }

    #[tokio::test]
    async fn test_mock_disconnect_failure() {
        let adapter = MockWalletAdapter::new("Solflare", "XYZ").with_disconnect_failure("stuck");
        adapter.connect().await.unwrap();

        assert!(adapter.disconnect().await.is_err());
        assert_eq!(adapter.disconnect_calls(), 1);
        assert_eq!(adapter.public_key().as_deref(), Some("XYZ"));
    }
}
