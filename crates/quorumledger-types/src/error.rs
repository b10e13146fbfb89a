//! Error types for the QuorumLedger settlement engine.
//!
//! All errors use the `QL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by taxonomy:
//! - 1xx: Input rejected (malformed or out-of-domain input)
//! - 2xx: Policy denied (valid but disallowed operation)
//! - 3xx: Data integrity violation (store invariant broken, write rejected)
//! - 9xx: General / internal / configuration errors
//!
//! Most decision functions never return these: malformed input yields an
//! empty/false result. The enum is used where a caller asked for a guard
//! (`Result`-returning variants) and at the store boundary.

use thiserror::Error;

use crate::{Account, Currency, EntryId, EpochId, NodeId, SettlementState, VoteId};

/// Coarse classification of a [`QuorumLedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-domain input.
    InputRejected,
    /// Semantically valid but disallowed by policy. Caller may remediate.
    PolicyDenied,
    /// A persistence invariant would be violated. Fatal to the write.
    DataIntegrityViolation,
    /// Configuration, serialization or internal failure.
    Internal,
}

/// Central error enum for all QuorumLedger operations.
#[derive(Debug, Error)]
pub enum QuorumLedgerError {
    // =================================================================
    // Input Rejected (1xx)
    // =================================================================
    /// Input failed structural validation.
    #[error("QL_ERR_100: Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Two settlement windows cover the same instant.
    #[error("QL_ERR_101: Overlapping settlement windows")]
    OverlappingWindows,

    // =================================================================
    // Policy Denied (2xx)
    // =================================================================
    /// Lifecycle edge not present in the settlement state machine.
    #[error("QL_ERR_200: Invalid settlement transition: {from} -> {to}")]
    InvalidTransition {
        from: SettlementState,
        to: SettlementState,
    },

    /// Not enough approved votes.
    #[error("QL_ERR_201: Quorum not reached: {approved}/{voters} approved")]
    QuorumNotReached { approved: usize, voters: usize },

    /// Commits halted by the risk circuit breaker.
    #[error("QL_ERR_202: Circuit breaker tripped at risk score {score}")]
    CircuitBreakerTripped { score: rust_decimal::Decimal },

    /// Exposure is above the effective (margin-adjusted) tier limit.
    #[error("QL_ERR_203: Exposure {exposure_cents} exceeds effective limit {limit_cents}")]
    ExposureLimitExceeded {
        exposure_cents: i64,
        limit_cents: i64,
    },

    /// Amount requires step-up authentication for this role.
    #[error("QL_ERR_204: Step-up authentication required for role {role} at {amount_cents}")]
    StepUpRequired { role: String, amount_cents: i64 },

    /// No eligible leader could be elected.
    #[error("QL_ERR_205: No eligible leader")]
    NoEligibleLeader,

    // =================================================================
    // Data Integrity Violation (3xx)
    // =================================================================
    /// Sequence is not strictly greater than the account's last sequence.
    #[error("QL_ERR_300: Sequence conflict on {account}: got {sequence}, last committed {last:?}")]
    SequenceConflict {
        account: Account,
        sequence: u64,
        last: Option<u64>,
    },

    /// An entry with this ID was already persisted.
    #[error("QL_ERR_301: Duplicate ledger entry: {0}")]
    DuplicateEntry(EntryId),

    /// A different vote for this (node, epoch) was already recorded.
    #[error("QL_ERR_302: Duplicate vote from {node_id} in {epoch}")]
    DuplicateVote { node_id: NodeId, epoch: EpochId },

    /// A vote with this ID was already recorded for a different (node, epoch).
    #[error("QL_ERR_303: Vote id reused: {0}")]
    VoteIdReused(VoteId),

    /// Transaction entries do not sum to zero.
    #[error("QL_ERR_304: Unbalanced transaction in {currency}: net {net_cents}")]
    UnbalancedTransaction { currency: Currency, net_cents: i64 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("QL_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("QL_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid policy file, bad override, failed validation).
    #[error("QL_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error.
    #[error("QL_ERR_903: I/O error: {0}")]
    Io(String),
}

impl QuorumLedgerError {
    /// Which taxonomy bucket this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } | Self::OverlappingWindows => ErrorKind::InputRejected,
            Self::InvalidTransition { .. }
            | Self::QuorumNotReached { .. }
            | Self::CircuitBreakerTripped { .. }
            | Self::ExposureLimitExceeded { .. }
            | Self::StepUpRequired { .. }
            | Self::NoEligibleLeader => ErrorKind::PolicyDenied,
            Self::SequenceConflict { .. }
            | Self::DuplicateEntry(_)
            | Self::DuplicateVote { .. }
            | Self::VoteIdReused(_)
            | Self::UnbalancedTransaction { .. } => ErrorKind::DataIntegrityViolation,
            Self::Internal(_) | Self::Serialization(_) | Self::Configuration(_) | Self::Io(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, QuorumLedgerError>;

impl From<std::io::Error> for QuorumLedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for QuorumLedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
