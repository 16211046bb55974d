/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public wallet-session crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod adapter;
pub mod config;
pub mod controller;
pub mod environment;
pub mod error;
pub mod registry;
pub mod store;
pub mod types;

// Re-export commonly used types from adapter
pub use adapter::{
    AdapterEventEmitter,
    ConnectBehavior,
    EventHandler,
    MockWalletAdapter,
    Subscription,
    WalletAdapter,
};

pub use config::SessionConfig;
pub use controller::SessionController;
pub use environment::{ExecutionContext, Navigator, RecordingNavigator, TracingNavigator};
pub use error::{Result, WalletError};
pub use registry::{StaticWalletSource, WalletDescriptor, WalletRegistry, WalletSource};
pub use store::{SessionState, SessionStatus, SessionStore};

// Re-export all types
pub use types::*;
