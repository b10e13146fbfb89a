//! Settlement lifecycle transitions.
//!
//! The edge table lives on [`SettlementState::can_transition_to`]; this
//! module turns it into a guard and tracks one settlement through it.

use quorumledger_types::{QuorumLedgerError, Result, SettlementState};

/// Accept `from → to` if it is an edge of the lifecycle, returning `to`.
///
/// Arguments run source first: `validate_transition(from, to)`, not `(to, from)`.
///
/// # Errors
/// [`QuorumLedgerError::InvalidTransition`] for any other pair, including
/// self-transitions and anything leaving a terminal state.
pub fn validate_transition(from: SettlementState, to: SettlementState) -> Result<SettlementState> {
    if from.can_transition_to(to) {
        tracing::debug!(%from, %to, "settlement transition");
        Ok(to)
    } else {
        tracing::debug!(%from, %to, "settlement transition rejected");
        Err(QuorumLedgerError::InvalidTransition { from, to })
    }
}

/// One window's progress through the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementRecord {
    pub window_id: String,
    state: SettlementState,
}

impl SettlementRecord {
    /// A new record in [`SettlementState::Queued`].
    #[must_use]
    pub fn new(window_id: impl Into<String>) -> Self {
        Self {
            window_id: window_id.into(),
            state: SettlementState::Queued,
        }
    }

    #[must_use]
    pub fn state(&self) -> SettlementState {
        self.state
    }

    /// Move to `to`. The state is unchanged on error.
    ///
    /// # Errors
    /// See [`validate_transition`].
    pub fn advance(&mut self, to: SettlementState) -> Result<()> {
        self.state = validate_transition(self.state, to)?;
        Ok(())
    }
}
