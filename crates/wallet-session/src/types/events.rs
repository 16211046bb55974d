/*
[INPUT]:  Notifications emitted by an external wallet adapter
[OUTPUT]: AdapterEvent values delivered to subscribed handlers
[POS]:    Data layer - adapter event vocabulary
[UPDATE]: When adapters gain new event kinds
*/

use std::fmt;

/// Event emitted by a wallet adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterEvent {
    /// Transport is live; carries the identity the wallet reported
    Connect { public_key: String },
    /// Transport dropped
    Disconnect,
    /// Adapter reported a failure
    Error { message: String },
}

impl AdapterEvent {
    pub fn connect(public_key: impl Into<String>) -> Self {
        AdapterEvent::Connect {
            public_key: public_key.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        AdapterEvent::Error {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> AdapterEventKind {
        match self {
            AdapterEvent::Connect { .. } => AdapterEventKind::Connect,
            AdapterEvent::Disconnect => AdapterEventKind::Disconnect,
            AdapterEvent::Error { .. } => AdapterEventKind::Error,
        }
    }
}

/// Discriminant of [`AdapterEvent`], used in log fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterEventKind {
    Connect,
    Disconnect,
    Error,
}

impl fmt::Display for AdapterEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdapterEventKind::Connect => "connect",
            AdapterEventKind::Disconnect => "disconnect",
            AdapterEventKind::Error => "error",
        };
        f.write_str(name)
    }
}
