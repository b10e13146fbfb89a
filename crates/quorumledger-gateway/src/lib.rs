//! # quorumledger-gateway
//!
//! Front-door checks for commands entering **QuorumLedger**.
//!
//! 1. **SecurityGate**: structural token validation, role permission levels,
//!    and step-up gating by amount
//! 2. **RoutingGateway**: deterministic replica selection, route health, and
//!    even load distribution across channels
//!
//! ```text
//! Command → SecurityGate.authorize() → RoutingGateway.select_replica() → ConsensusEngine
//! ```

pub mod routing;
pub mod security;

pub use routing::{RoutingGateway, balanced_distribution, route_health, select_replica};
pub use security::{AccessDecision, SecurityGate, validate_token};
