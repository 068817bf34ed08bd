//! Message counters.
//!
//! The bridge only ever increments; exporting the values is up to whoever
//! implements [`Counters`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Counter for messages accepted from either network.
pub const RECEIVED_MESSAGES: &str = "received_messages";

/// Counter for messages successfully delivered to either network.
pub const SENT_MESSAGES: &str = "sent_messages";

/// Which network a counted message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Gitter.
    Remote,
    /// Matrix.
    Home,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Remote => "remote",
            Side::Home => "matrix",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fire-and-forget observability hooks.
pub trait Counters: Send + Sync {
    fn inc_counter(&self, name: &str, side: Side);

    fn inc_remote_call_counter(&self, name: &str);
}

/// In-memory counter sink.
#[derive(Debug, Default)]
pub struct CounterSet {
    messages: Mutex<HashMap<(String, Side), u64>>,
    remote_calls: Mutex<HashMap<String, u64>>,
}

impl CounterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a message counter.
    pub fn get(&self, name: &str, side: Side) -> u64 {
        self.messages
            .lock()
            .map(|m| m.get(&(name.to_string(), side)).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Current value of a remote call counter.
    pub fn remote_calls(&self, name: &str) -> u64 {
        self.remote_calls
            .lock()
            .map(|m| m.get(name).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl Counters for CounterSet {
    fn inc_counter(&self, name: &str, side: Side) {
        if let Ok(mut messages) = self.messages.lock() {
            *messages.entry((name.to_string(), side)).or_default() += 1;
        }
    }

    fn inc_remote_call_counter(&self, name: &str) {
        if let Ok(mut calls) = self.remote_calls.lock() {
            *calls.entry(name.to_string()).or_default() += 1;
        }
    }
}
