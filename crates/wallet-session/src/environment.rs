/*
[INPUT]:  Host capabilities injected at construction (interactive or not, URL opening)
[OUTPUT]: ExecutionContext flag and Navigator implementations
[POS]:    Environment layer - replaces ambient host detection with explicit capabilities
[UPDATE]: When new host capabilities are needed by the controller
*/

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

/// Whether the process can interact with a user and their wallet providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionContext {
    #[default]
    Interactive,
    /// Server-side render, batch job, or test harness with no wallet providers
    Headless,
}

impl ExecutionContext {
    pub fn is_interactive(self) -> bool {
        matches!(self, ExecutionContext::Interactive)
    }
}

/// Capability used to send the user to an external page
pub trait Navigator: Send + Sync {
    fn open(&self, url: &Url);
}

/// Navigator that only records the redirect in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn open(&self, url: &Url) {
        info!(url = %url, "open installation page");
    }
}

/// Navigator that remembers every URL it was asked to open
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    opened: Mutex<Vec<Url>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<Url> {
        self.opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn open(&self, url: &Url) {
        self.opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.clone());
    }
}
