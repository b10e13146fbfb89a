//! Resilience monitor: outage classification and notification gating.
//!
//! An outage is placed on a duration band (short / medium / long) and a
//! breadth band (narrow / some / wide), then looked up in a fixed matrix.
//! Breadth dominates duration: a long outage of one service stays MINOR,
//! while a short outage across many services is already MAJOR.
//!
//! ```text
//!              short       medium      long
//! narrow   NEGLIGIBLE     MINOR       MINOR
//! some          MINOR     MINOR       MAJOR
//! wide          MAJOR     MAJOR    CRITICAL
//! ```

use quorumledger_types::{OutageTier, PolicyConfig, ResiliencePolicy};

const MATRIX: [[OutageTier; 3]; 3] = [
    [OutageTier::Negligible, OutageTier::Minor, OutageTier::Minor],
    [OutageTier::Minor, OutageTier::Minor, OutageTier::Major],
    [OutageTier::Major, OutageTier::Major, OutageTier::Critical],
];

#[derive(Debug, Clone, Default)]
pub struct ResilienceMonitor {
    policy: ResiliencePolicy,
}

impl ResilienceMonitor {
    #[must_use]
    pub fn new(policy: ResiliencePolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.resilience.clone())
    }

    fn duration_band(&self, minutes: u32) -> usize {
        if minutes >= self.policy.major_minutes {
            2
        } else if minutes >= self.policy.minor_minutes {
            1
        } else {
            0
        }
    }

    fn breadth_band(&self, affected_services: u32) -> usize {
        if affected_services >= self.policy.wide_services {
            2
        } else if affected_services >= self.policy.some_services {
            1
        } else {
            0
        }
    }

    /// Severity of an outage lasting `minutes` across `affected_services`.
    /// No affected services is always NEGLIGIBLE.
    #[must_use]
    pub fn outage_tier(&self, minutes: u32, affected_services: u32) -> OutageTier {
        if affected_services == 0 {
            return OutageTier::Negligible;
        }
        MATRIX[self.breadth_band(affected_services)][self.duration_band(minutes)]
    }

    /// Estimated minutes to recover from an outage of `tier`.
    #[must_use]
    pub fn recovery_time(&self, tier: OutageTier) -> u32 {
        self.policy.recovery.for_tier(tier)
    }

    /// Whether this outage warrants external notification (MAJOR or worse).
    #[must_use]
    pub fn should_notify(&self, minutes: u32, affected_services: u32) -> bool {
        let tier = self.outage_tier(minutes, affected_services);
        let notify = tier.warrants_notification();
        if notify {
            tracing::warn!(minutes, affected_services, %tier, "outage requires notification");
        }
        notify
    }
}
