//! # quorumledger-types
//!
//! Shared types, errors, and policy configuration for the **QuorumLedger**
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`EntryId`], [`VoteId`], [`NodeId`], [`EpochId`], [`Account`], [`Currency`]
//! - **Ledger model**: [`LedgerEntry`]
//! - **Vote model**: [`QuorumVote`], [`Node`]
//! - **Settlement model**: [`SettlementWindow`], [`SettlementAssignment`], [`SettlementState`]
//! - **Routing model**: [`WeightedRoute`]
//! - **Classifications**: [`HealthStatus`], [`RiskTier`], [`OutageTier`]
//! - **Envelope**: [`Command`], [`Event`], [`Subsystem`]
//! - **Configuration**: [`PolicyConfig`] and its per-component policies
//! - **Errors**: [`QuorumLedgerError`] with `QL_ERR_` prefix codes
//! - **Constants**: policy defaults

pub mod config;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod health;
pub mod ids;
pub mod ledger;
pub mod outage;
pub mod risk;
pub mod route;
pub mod vote;
pub mod window;

// Re-export all primary types at crate root for ergonomic imports:
//   use quorumledger_types::{LedgerEntry, QuorumVote, SettlementState, ...};

pub use config::*;
pub use envelope::*;
pub use error::*;
pub use health::*;
pub use ids::*;
pub use ledger::*;
pub use outage::*;
pub use risk::*;
pub use route::*;
pub use vote::*;
pub use window::*;

// Constants are accessed via `quorumledger_types::constants::FOO`
// (not re-exported to avoid name collisions).
