//! # quorumledger-settlement
//!
//! Settlement plane of the **QuorumLedger** engine.
//!
//! - [`plan_settlement`] / [`window_overlap`]: round-robin batching of
//!   half-open settlement windows and overlap detection
//! - [`SettlementPlanner`]: one batch per eligible leader, refusing
//!   overlapping windows
//! - [`validate_transition`] / [`SettlementRecord`]: the settlement
//!   lifecycle guard
//! - [`LedgerStore`]: append-only ledger enforcing unique entries,
//!   per-account sequence ordering and balanced transactions
//!
//! ## Commit Flow
//!
//! ```text
//! windows ─▶ SettlementPlanner.plan() ─▶ QUEUED → ALLOCATED → SETTLING
//!                                               │
//!            RiskEngine.check_commit() ◀────────┘
//!                    │
//!                    ▼
//!        LedgerStore.commit_transaction() ─▶ SETTLED   (or FAILED)
//! ```

pub mod ledger;
pub mod lifecycle;
pub mod planner;

pub use ledger::{LedgerStore, verify_balanced};
pub use lifecycle::{SettlementRecord, validate_transition};
pub use planner::{SettlementPlan, SettlementPlanner, plan_settlement, window_overlap};
