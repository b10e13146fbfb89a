//! # quorumledger-consensus
//!
//! Consensus decisions for the **QuorumLedger** settlement engine.
//!
//! - [`check_quorum`]: approved votes over distinct voting nodes vs. a threshold
//! - [`health_status`]: cluster health over `total_nodes + 1` members
//! - [`elect_leader`] / [`eligible_leaders`]: deterministic leader eligibility
//! - [`replay`]: commutative, idempotent reconciliation of event streams,
//!   with [`replay_root`] to confirm convergence across nodes
//! - [`VoteRegistry`]: concurrent store enforcing one vote per `(node, epoch)`
//! - [`ConsensusEngine`]: the above bound to a [`ConsensusPolicy`]
//!
//! Everything except [`VoteRegistry`] is a pure function of its arguments.
//!
//! [`ConsensusPolicy`]: quorumledger_types::ConsensusPolicy

pub mod engine;
pub mod leader;
pub mod quorum;
pub mod replay;
pub mod vote_registry;

pub use engine::ConsensusEngine;
pub use leader::{elect_leader, eligible_leaders};
pub use quorum::{Tally, check_quorum, health_status, votes_for_epoch};
pub use replay::{ReplayEvent, replay, replay_root, replay_root_hex, verify_replay_root};
pub use vote_registry::{VoteOutcome, VoteRegistry};
