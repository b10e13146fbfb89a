//! Risk tier classification.
//!
//! Tiers are ordered by severity. Each tier carries a nominal exposure
//! ceiling (see [`ExposureLimits`](crate::ExposureLimits)) that shrinks as
//! severity grows; callers always enforce the ceiling minus a safety margin.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity tier derived from a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// All tiers, least severe first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
