//! Health classification shared by the consensus engine and routing gateway.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Three-band health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Critical,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "HEALTHY"),
            Self::Degraded => write!(f, "DEGRADED"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Ratio cut-offs: `ratio >= healthy` is healthy, `ratio >= degraded` is
/// degraded, anything lower is critical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBands {
    pub healthy: Decimal,
    pub degraded: Decimal,
}

impl Default for HealthBands {
    fn default() -> Self {
        Self {
            healthy: Decimal::new(constants::DEFAULT_HEALTHY_RATIO_BPS, constants::BPS_SCALE),
            degraded: Decimal::new(constants::DEFAULT_DEGRADED_RATIO_BPS, constants::BPS_SCALE),
        }
    }
}

impl HealthBands {
    #[must_use]
    pub fn classify(&self, ratio: Decimal) -> HealthStatus {
        if ratio >= self.healthy {
            HealthStatus::Healthy
        } else if ratio >= self.degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Critical
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_band_edges() {
        let bands = HealthBands::default();
        assert_eq!(bands.classify(Decimal::new(66, 2)), HealthStatus::Healthy);
        assert_eq!(bands.classify(Decimal::new(6599, 4)), HealthStatus::Degraded);
        assert_eq!(bands.classify(Decimal::new(33, 2)), HealthStatus::Degraded);
        assert_eq!(bands.classify(Decimal::new(3299, 4)), HealthStatus::Critical);
        assert_eq!(bands.classify(Decimal::ZERO), HealthStatus::Critical);
        assert_eq!(bands.classify(Decimal::ONE), HealthStatus::Healthy);
    }

    #[test]
    fn severity_ordering() {
        assert!(HealthStatus::Healthy < HealthStatus::Degraded);
        assert!(HealthStatus::Degraded < HealthStatus::Critical);
    }
}
