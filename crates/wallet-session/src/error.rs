/*
[INPUT]:  Error sources (wallet adapters, timeouts, configuration, IO)
[OUTPUT]: Structured error types with retry and rejection hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new failure kinds or improving error messages
*/

use thiserror::Error;

/// Main error type for wallet sessions
#[derive(Error, Debug)]
pub enum WalletError {
    /// The user declined the connection request in the wallet
    #[error("Connection request rejected in {wallet}")]
    Rejected { wallet: String },

    /// The wallet adapter failed for another reason
    #[error("Wallet adapter error ({wallet}): {message}")]
    Adapter { wallet: String, message: String },

    /// The adapter's connect call did not resolve in time
    #[error("Connecting to {wallet} timed out after {duration_ms}ms")]
    Timeout { wallet: String, duration_ms: u64 },

    /// No wallet with this name has been discovered
    #[error("Unknown wallet: {0}")]
    UnknownWallet(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WalletError {
    /// Create an adapter error for a named wallet
    pub fn adapter(wallet: impl Into<String>, message: impl Into<String>) -> Self {
        WalletError::Adapter {
            wallet: wallet.into(),
            message: message.into(),
        }
    }

    /// Check if the user may simply try again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WalletError::Rejected { .. } | WalletError::Adapter { .. } | WalletError::Timeout { .. }
        )
    }

    /// Check if the failure came from the user declining in the wallet
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, WalletError::Rejected { .. })
    }

    /// Name of the wallet involved, if the error is wallet-specific
    pub fn wallet(&self) -> Option<&str> {
        match self {
            WalletError::Rejected { wallet }
            | WalletError::Adapter { wallet, .. }
            | WalletError::Timeout { wallet, .. } => Some(wallet),
            WalletError::UnknownWallet(name) => Some(name),
            _ => None,
        }
    }
}

/// Result type alias for wallet session operations
pub type Result<T> = std::result::Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WalletError::Rejected { wallet: "Phantom".into() }, true)]
    #[case(WalletError::adapter("Phantom", "boom"), true)]
    #[case(WalletError::Timeout { wallet: "Phantom".into(), duration_ms: 10 }, true)]
    #[case(WalletError::UnknownWallet("Nope".into()), false)]
    #[case(WalletError::Config("bad".into()), false)]
    fn test_error_retryable(#[case] err: WalletError, #[case] expected: bool) {
        assert_eq!(err.is_retryable(), expected);
    }

    #[test]
    fn test_error_is_user_rejection() {
        assert!(WalletError::Rejected { wallet: "Solflare".into() }.is_user_rejection());
        assert!(!WalletError::adapter("Solflare", "locked").is_user_rejection());
    }

    #[test]
    fn test_error_messages() {
        let err = WalletError::Timeout {
            wallet: "Phantom".to_string(),
            duration_ms: 1500,
        };
        assert_eq!(err.to_string(), "Connecting to Phantom timed out after 1500ms");
        assert_eq!(err.wallet(), Some("Phantom"));

        let err = WalletError::adapter("Solflare", "wallet locked");
        assert_eq!(err.to_string(), "Wallet adapter error (Solflare): wallet locked");
        assert_eq!(WalletError::Config("x".into()).wallet(), None);
    }
}
