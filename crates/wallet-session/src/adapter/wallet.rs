/*
[INPUT]:  Wallet driver implementation (browser extension bridge, test double, ...)
[OUTPUT]: Uniform connect/disconnect/subscribe capability
[POS]:    Adapter layer - wallet integration abstraction
[UPDATE]: When adding new adapter operations or identity fields
*/

use async_trait::async_trait;

use crate::adapter::{EventHandler, Subscription};
use crate::error::Result;
use crate::types::WalletReadyState;

/// Capability exposed by a single wallet provider's driver
///
/// Implementations emit [`AdapterEvent`](crate::types::AdapterEvent)s to every
/// subscribed handler. The trait is async because connecting usually waits on
/// the user approving the request inside the wallet.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Human-readable wallet name, unique within a registry
    fn name(&self) -> &str;

    /// Installation status as reported by the host
    fn ready_state(&self) -> WalletReadyState;

    /// Identity of the connected account, if any
    fn public_key(&self) -> Option<String>;

    /// Attach an event handler; it stays attached until the handle is dropped
    fn subscribe(&self, handler: EventHandler) -> Subscription;

    /// Ask the wallet for a connection
    async fn connect(&self) -> Result<()>;

    /// Close the connection
    async fn disconnect(&self) -> Result<()>;
}
