//! Risk engine: exposure scoring, tiering and the commit circuit breaker.
//!
//! ## Design Principles
//!
//! - **Monotone**: the score never decreases when exposure, incidents or
//!   volatility grow. Negative exposure and volatility clamp to zero.
//! - **Fail-closed**: a degraded cluster always trips the breaker,
//!   whatever the score.
//! - **Margin first**: commits are checked against the tier ceiling minus
//!   the safety margin, never against the nominal ceiling.
//!
//! All arithmetic is `Decimal` so every node computes the same score.

use quorumledger_types::constants::EXPOSURE_UNIT_CENTS;
use quorumledger_types::{PolicyConfig, QuorumLedgerError, Result, RiskPolicy, RiskTier};
use rust_decimal::Decimal;

/// Stateless risk decisions under one [`RiskPolicy`].
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    policy: RiskPolicy,
}

impl RiskEngine {
    #[must_use]
    pub fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.risk.clone())
    }

    #[must_use]
    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Weighted sum of exposure (per million cents), incident count and
    /// volatility. Saturates instead of overflowing.
    #[must_use]
    pub fn compute_risk_score(&self, exposure_cents: i64, incidents: u32, volatility: Decimal) -> Decimal {
        let exposure_units =
            Decimal::from(exposure_cents.max(0)) / Decimal::from(EXPOSURE_UNIT_CENTS);
        let volatility = volatility.max(Decimal::ZERO);

        self.policy
            .exposure_weight
            .saturating_mul(exposure_units)
            .saturating_add(self.policy.incident_weight.saturating_mul(Decimal::from(incidents)))
            .saturating_add(self.policy.volatility_weight.saturating_mul(volatility))
    }

    /// Highest tier whose threshold `score` reaches.
    #[must_use]
    pub fn risk_tier(&self, score: Decimal) -> RiskTier {
        let tiers = &self.policy.tiers;
        if score >= tiers.critical {
            RiskTier::Critical
        } else if score >= tiers.high {
            RiskTier::High
        } else if score >= tiers.medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// `score > breaker_threshold || degraded`.
    #[must_use]
    pub fn requires_circuit_breaker(&self, score: Decimal, degraded: bool) -> bool {
        degraded || score > self.policy.breaker_threshold
    }

    /// Nominal ceiling for `tier`, in cents.
    #[must_use]
    pub fn exposure_limit(&self, tier: RiskTier) -> i64 {
        self.policy.exposure_limits.for_tier(tier)
    }

    /// Ceiling actually enforced: nominal limit minus the safety margin.
    #[must_use]
    pub fn effective_exposure_limit(&self, tier: RiskTier) -> i64 {
        self.exposure_limit(tier)
            .saturating_sub(self.policy.safety_margin_cents)
    }

    /// Final gate before a ledger commit. Returns the tier the commit ran
    /// under.
    ///
    /// # Errors
    /// - [`QuorumLedgerError::CircuitBreakerTripped`] when the breaker trips.
    /// - [`QuorumLedgerError::ExposureLimitExceeded`] when `exposure_cents`
    ///   is above the effective limit for the score's tier.
    pub fn check_commit(&self, exposure_cents: i64, score: Decimal, degraded: bool) -> Result<RiskTier> {
        if self.requires_circuit_breaker(score, degraded) {
            tracing::warn!(%score, degraded, "circuit breaker tripped; commit halted");
            return Err(QuorumLedgerError::CircuitBreakerTripped { score });
        }
        let tier = self.risk_tier(score);
        let limit_cents = self.effective_exposure_limit(tier);
        if exposure_cents > limit_cents {
            tracing::warn!(exposure_cents, limit_cents, %tier, "exposure above effective limit");
            return Err(QuorumLedgerError::ExposureLimitExceeded {
                exposure_cents,
                limit_cents,
            });
        }
        tracing::debug!(%score, %tier, exposure_cents, "commit cleared risk gate");
        Ok(tier)
    }
}
