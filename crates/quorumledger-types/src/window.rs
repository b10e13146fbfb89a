//! Settlement window and lifecycle types.
//!
//! ## State Machine
//!
//! ```text
//!   ┌────────┐   ┌───────────┐   ┌──────────┐   ┌─────────┐
//!   │ QUEUED ├──▶│ ALLOCATED ├──▶│ SETTLING ├──▶│ SETTLED │
//!   └───┬────┘   └─────┬─────┘   └────┬─────┘   └─────────┘
//!       │              │              │
//!       └──────────────┴──────────────┴──▶ FAILED | CANCELLED
//! ```
//!
//! `SETTLED`, `FAILED` and `CANCELLED` are terminal. No other edge exists.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of pending settlement work covering `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementWindow {
    pub window_id: String,
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
    /// Caller-defined weight / urgency. Higher is more urgent.
    pub urgency: u32,
}

impl SettlementWindow {
    #[must_use]
    pub fn new(
        window_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        urgency: u32,
    ) -> Self {
        Self {
            window_id: window_id.into(),
            start,
            end,
            urgency,
        }
    }

    /// A window whose end is not after its start covers no time.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Half-open intersection test against another window.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }
}

/// Relates one window to exactly one batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementAssignment {
    pub window_id: String,
    pub batch_index: usize,
}

/// Lifecycle state of a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementState {
    /// Waiting for batch allocation.
    Queued,
    /// Assigned to a batch.
    Allocated,
    /// Ledger entries being committed.
    Settling,
    /// Committed. Terminal.
    Settled,
    /// Aborted by an error. Terminal.
    Failed,
    /// Withdrawn by the caller. Terminal.
    Cancelled,
}

impl SettlementState {
    /// All states, happy path first.
    pub const ALL: [Self; 6] = [
        Self::Queued,
        Self::Allocated,
        Self::Settling,
        Self::Settled,
        Self::Failed,
        Self::Cancelled,
    ];

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Settled | Self::Failed | Self::Cancelled)
    }

    /// Can a settlement in this state move to `target`?
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Queued, Self::Allocated)
            | (Self::Allocated, Self::Settling)
            | (Self::Settling, Self::Settled) => true,
            (from, Self::Failed | Self::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for SettlementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "QUEUED"),
            Self::Allocated => write!(f, "ALLOCATED"),
            Self::Settling => write!(f, "SETTLING"),
            Self::Settled => write!(f, "SETTLED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}
