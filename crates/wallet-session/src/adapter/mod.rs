/*
[INPUT]:  Per-wallet driver objects supplied by the host environment
[OUTPUT]: WalletAdapter capability, event subscriptions, scripted mock adapter
[POS]:    Adapter layer - boundary to external wallet drivers
[UPDATE]: When the adapter capability or event delivery changes
*/

pub mod emitter;
pub mod mock;
pub mod wallet;

pub use emitter::{AdapterEventEmitter, EventHandler, Subscription};
pub use mock::{ConnectBehavior, MockWalletAdapter};
pub use wallet::WalletAdapter;
