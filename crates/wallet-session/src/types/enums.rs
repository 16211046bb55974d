/*
[INPUT]:  Wallet provider readiness as reported by the host environment
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - readiness and policy enums
[UPDATE]: When readiness states or session policies change
*/

use serde::{Deserialize, Serialize};

/// Installation/availability status of a wallet provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletReadyState {
    Installed,
    Loadable,
    NotDetected,
    Unsupported,
}

impl WalletReadyState {
    /// Rank bucket used when ordering wallets for display.
    ///
    /// Lower sorts first. Not-detected and unsupported wallets share a bucket.
    pub fn priority(self) -> u8 {
        match self {
            WalletReadyState::Installed => 0,
            WalletReadyState::Loadable => 1,
            WalletReadyState::NotDetected | WalletReadyState::Unsupported => 2,
        }
    }

    /// Whether the provider can be connected without installing anything
    pub fn is_detected(self) -> bool {
        matches!(self, WalletReadyState::Installed | WalletReadyState::Loadable)
    }
}

/// What a transport-level `disconnect` event does to the authenticated session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectPolicy {
    /// Keep `is_authenticated`; only the transport link is dropped
    #[default]
    KeepSession,
    /// Treat a transport drop as the end of the authenticated session
    EndSession,
}

impl DisconnectPolicy {
    pub fn ends_session(self) -> bool {
        matches!(self, DisconnectPolicy::EndSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WalletReadyState::Installed, 0, true)]
    #[case(WalletReadyState::Loadable, 1, true)]
    #[case(WalletReadyState::NotDetected, 2, false)]
    #[case(WalletReadyState::Unsupported, 2, false)]
    fn test_ready_state_priority(
        #[case] state: WalletReadyState,
        #[case] priority: u8,
        #[case] detected: bool,
    ) {
        assert_eq!(state.priority(), priority);
        assert_eq!(state.is_detected(), detected);
    }

    #[test]
    fn test_ready_state_serde() {
        let parsed: WalletReadyState = serde_yaml::from_str("not_detected").unwrap();
        assert_eq!(parsed, WalletReadyState::NotDetected);
        assert_eq!(serde_yaml::to_string(&WalletReadyState::Installed).unwrap().trim(), "installed");
    }

    #[test]
    fn test_disconnect_policy_default() {
        assert_eq!(DisconnectPolicy::default(), DisconnectPolicy::KeepSession);
        assert!(!DisconnectPolicy::KeepSession.ends_session());
        assert!(DisconnectPolicy::EndSession.ends_session());
    }
}
