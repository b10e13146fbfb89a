//! # quorumledger-risk
//!
//! Commit-time risk gating and outage handling for **QuorumLedger**.
//!
//! - [`RiskEngine`]: exposure scoring, risk tiers, circuit breaker, and
//!   margin-adjusted exposure ceilings
//! - [`ResilienceMonitor`]: outage tiering by duration and breadth, recovery
//!   estimates, and notification gating
//!
//! Both hold only an immutable policy and are safe to share across threads.

pub mod resilience;
pub mod risk_engine;

pub use resilience::ResilienceMonitor;
pub use risk_engine::RiskEngine;
