/*
[INPUT]:  SessionState snapshots
[OUTPUT]: Serializable report printed by the binary
[POS]:    Output layer - state rendering for the terminal
[UPDATE]: When the printed session fields change
*/

use serde::Serialize;
use wallet_session::{SessionState, SessionStatus, WalletDescriptor, WalletReadyState};

/// Snapshot of the session after one step of the simulation
#[derive(Debug, Serialize)]
pub struct StateReport {
    pub step: String,
    pub status: SessionStatus,
    pub active_wallet: Option<String>,
    #[serde(flatten)]
    pub state: SessionState,
}

impl StateReport {
    pub fn new(step: &str, state: SessionState) -> Self {
        Self {
            step: step.to_string(),
            status: state.status(),
            active_wallet: state.active_wallet().map(str::to_string),
            state,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One-line summary per wallet, in display order
pub fn wallet_lines(wallets: &[WalletDescriptor]) -> Vec<String> {
    wallets
        .iter()
        .enumerate()
        .map(|(index, wallet)| {
            format!(
                "{}. {} ({})",
                index + 1,
                wallet.name,
                ready_label(wallet.ready_state)
            )
        })
        .collect()
}

fn ready_label(state: WalletReadyState) -> &'static str {
    match state {
        WalletReadyState::Installed => "installed",
        WalletReadyState::Loadable => "loadable",
        WalletReadyState::NotDetected => "not detected",
        WalletReadyState::Unsupported => "unsupported",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_flattens_state() {
        let report = StateReport::new("start", SessionState::default());
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["step"], "start");
        assert_eq!(json["status"], "idle");
        assert_eq!(json["is_connected"], false);
        assert!(json["public_key"].is_null());
        assert!(json["active_wallet"].is_null());
    }
}
