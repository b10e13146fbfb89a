//! Command / event envelope shared by every handler that wraps a subsystem.
//!
//! ```text
//! Command{command_id, region, action, priority, issued_at}
//!   → Event{event_id = "<subsystem>:<command_id>",
//!           event_type = "<subsystem>.handled",
//!           correlation_id = command_id,
//!           idempotency_key = event_id, region}
//! ```
//!
//! Downstream bus deduplication keys on `idempotency_key`. Nothing in this
//! workspace deduplicates events itself.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The subsystem that handled a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    Consensus,
    Risk,
    Settlement,
    Security,
    Routing,
    Resilience,
}

impl Subsystem {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Consensus => "consensus",
            Self::Risk => "risk",
            Self::Settlement => "settlement",
            Self::Security => "security",
            Self::Routing => "routing",
            Self::Resilience => "resilience",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound request marshalled by an external handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub command_id: String,
    pub region: String,
    pub action: String,
    pub priority: u8,
    pub issued_at: DateTime<Utc>,
}

/// Outbound notification that a subsystem handled a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub region: String,
    pub event_type: String,
    pub correlation_id: String,
    pub idempotency_key: String,
}

impl Event {
    /// Build the `<subsystem>.handled` event for a command.
    ///
    /// Deterministic: the same subsystem and command always yield the same
    /// `event_id` and therefore the same `idempotency_key`.
    #[must_use]
    pub fn handled(subsystem: Subsystem, command: &Command) -> Self {
        let event_id = format!("{subsystem}:{}", command.command_id);
        Self {
            idempotency_key: event_id.clone(),
            event_id,
            region: command.region.clone(),
            event_type: format!("{subsystem}.handled"),
            correlation_id: command.command_id.clone(),
        }
    }
}
