//! Policy configuration for the QuorumLedger decision engines.
//!
//! Every threshold the engines apply is policy, not mechanism, so it lives
//! here rather than in code. A [`PolicyConfig`] is built once at startup,
//! validated, and handed to each engine by value or reference. Construction
//! failures surface as [`QuorumLedgerError::Configuration`]; there is no
//! process-wide cache and no silent fallback to an empty policy.
//!
//! Sources, in order of precedence (last wins):
//! 1. Built-in defaults from [`constants`]
//! 2. A JSON policy file (`QL_POLICY_FILE` or [`PolicyConfig::load`])
//! 3. Individual `QL_*` environment overrides

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{HealthBands, OutageTier, QuorumLedgerError, Result, RiskTier, constants};

/// Environment key naming a JSON policy file.
pub const ENV_POLICY_FILE: &str = "QL_POLICY_FILE";

/// Top-level policy for all engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub consensus: ConsensusPolicy,
    pub risk: RiskPolicy,
    pub security: SecurityPolicy,
    pub resilience: ResiliencePolicy,
}

// ---------------------------------------------------------------------------
// Consensus
// ---------------------------------------------------------------------------

/// Quorum threshold and health bands. Routing reuses the same bands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusPolicy {
    /// Approval fraction in `[0, 1]` required for quorum.
    pub quorum_threshold: Decimal,
    pub health: HealthBands,
}

impl Default for ConsensusPolicy {
    fn default() -> Self {
        Self {
            quorum_threshold: Decimal::new(
                constants::DEFAULT_QUORUM_THRESHOLD_BPS,
                constants::BPS_SCALE,
            ),
            health: HealthBands::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

/// Scores at which each tier above LOW begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskTierThresholds {
    pub medium: Decimal,
    pub high: Decimal,
    pub critical: Decimal,
}

impl Default for RiskTierThresholds {
    fn default() -> Self {
        Self {
            medium: Decimal::from(constants::DEFAULT_MEDIUM_RISK_SCORE),
            high: Decimal::from(constants::DEFAULT_HIGH_RISK_SCORE),
            critical: Decimal::from(constants::DEFAULT_CRITICAL_RISK_SCORE),
        }
    }
}

/// Nominal exposure ceilings in cents, one per tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureLimits {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
    pub critical: i64,
}

impl Default for ExposureLimits {
    fn default() -> Self {
        Self {
            low: constants::DEFAULT_LOW_EXPOSURE_LIMIT_CENTS,
            medium: constants::DEFAULT_MEDIUM_EXPOSURE_LIMIT_CENTS,
            high: constants::DEFAULT_HIGH_EXPOSURE_LIMIT_CENTS,
            critical: constants::DEFAULT_CRITICAL_EXPOSURE_LIMIT_CENTS,
        }
    }
}

impl ExposureLimits {
    #[must_use]
    pub fn for_tier(&self, tier: RiskTier) -> i64 {
        match tier {
            RiskTier::Low => self.low,
            RiskTier::Medium => self.medium,
            RiskTier::High => self.high,
            RiskTier::Critical => self.critical,
        }
    }
}

/// Scoring weights, tier cut-offs, breaker threshold and exposure ceilings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    /// Score added per [`constants::EXPOSURE_UNIT_CENTS`] of exposure.
    pub exposure_weight: Decimal,
    /// Score added per incident.
    pub incident_weight: Decimal,
    /// Score added per unit of volatility.
    pub volatility_weight: Decimal,
    pub tiers: RiskTierThresholds,
    /// The breaker trips when the score is strictly above this value.
    pub breaker_threshold: Decimal,
    pub exposure_limits: ExposureLimits,
    /// Subtracted from every nominal ceiling before enforcement. Must be > 0.
    pub safety_margin_cents: i64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            exposure_weight: Decimal::from(constants::DEFAULT_EXPOSURE_WEIGHT),
            incident_weight: Decimal::from(constants::DEFAULT_INCIDENT_WEIGHT),
            volatility_weight: Decimal::from(constants::DEFAULT_VOLATILITY_WEIGHT),
            tiers: RiskTierThresholds::default(),
            breaker_threshold: Decimal::from(constants::DEFAULT_BREAKER_THRESHOLD),
            exposure_limits: ExposureLimits::default(),
            safety_margin_cents: constants::DEFAULT_EXPOSURE_SAFETY_MARGIN_CENTS,
        }
    }
}

// ---------------------------------------------------------------------------
// Security
// ---------------------------------------------------------------------------

/// Access level and step-up threshold for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePolicy {
    /// Ordinal permission level. Higher grants more.
    pub level: u8,
    /// Amounts strictly above this require step-up authentication.
    pub step_up_threshold_cents: i64,
}

impl RolePolicy {
    /// The policy applied to any role not present in the table.
    pub const UNKNOWN: Self = Self {
        level: constants::UNKNOWN_ROLE_LEVEL,
        step_up_threshold_cents: constants::UNKNOWN_ROLE_STEP_UP_CENTS,
    };
}

/// Token structure rules and the role table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityPolicy {
    pub min_token_length: usize,
    /// Keyed by lowercase role name.
    pub roles: BTreeMap<String, RolePolicy>,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        let roles = [
            ("viewer", 1, 0),
            ("operator", 2, 50_000),
            ("settler", 3, 1_000_000),
            ("admin", 4, 10_000_000),
        ]
        .into_iter()
        .map(|(name, level, step_up_threshold_cents)| {
            (
                name.to_string(),
                RolePolicy {
                    level,
                    step_up_threshold_cents,
                },
            )
        })
        .collect();
        Self {
            min_token_length: constants::DEFAULT_MIN_TOKEN_LENGTH,
            roles,
        }
    }
}

impl SecurityPolicy {
    /// Look up a role, case-insensitively. Unknown roles resolve to
    /// [`RolePolicy::UNKNOWN`].
    #[must_use]
    pub fn role(&self, name: &str) -> RolePolicy {
        self.roles
            .get(&normalize_role(name))
            .copied()
            .unwrap_or(RolePolicy::UNKNOWN)
    }
}

/// Canonical form of a role name used as the table key.
#[must_use]
pub fn normalize_role(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Resilience
// ---------------------------------------------------------------------------

/// Recovery estimate in minutes per outage tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryTimes {
    pub negligible: u32,
    pub minor: u32,
    pub major: u32,
    pub critical: u32,
}

impl Default for RecoveryTimes {
    fn default() -> Self {
        Self {
            negligible: constants::DEFAULT_RECOVERY_NEGLIGIBLE_MINUTES,
            minor: constants::DEFAULT_RECOVERY_MINOR_MINUTES,
            major: constants::DEFAULT_RECOVERY_MAJOR_MINUTES,
            critical: constants::DEFAULT_RECOVERY_CRITICAL_MINUTES,
        }
    }
}

impl RecoveryTimes {
    #[must_use]
    pub fn for_tier(&self, tier: OutageTier) -> u32 {
        match tier {
            OutageTier::Negligible => self.negligible,
            OutageTier::Minor => self.minor,
            OutageTier::Major => self.major,
            OutageTier::Critical => self.critical,
        }
    }
}

/// Outage matrix boundaries and recovery estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResiliencePolicy {
    /// Duration at which an outage stops being short.
    pub minor_minutes: u32,
    /// Duration at which an outage counts as long.
    pub major_minutes: u32,
    /// Affected-service count at which an outage stops being narrow.
    pub some_services: u32,
    /// Affected-service count at which an outage counts as wide.
    pub wide_services: u32,
    pub recovery: RecoveryTimes,
}

impl Default for ResiliencePolicy {
    fn default() -> Self {
        Self {
            minor_minutes: constants::DEFAULT_OUTAGE_MINOR_MINUTES,
            major_minutes: constants::DEFAULT_OUTAGE_MAJOR_MINUTES,
            some_services: constants::DEFAULT_OUTAGE_SOME_SERVICES,
            wide_services: constants::DEFAULT_OUTAGE_WIDE_SERVICES,
            recovery: RecoveryTimes::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl PolicyConfig {
    /// Parse and validate a JSON policy document. Missing sections and
    /// fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| QuorumLedgerError::Configuration(format!("invalid policy JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON policy file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            QuorumLedgerError::Configuration(format!(
                "cannot read policy file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&contents)
    }

    /// Build the policy from the process environment: the optional
    /// `QL_POLICY_FILE`, then individual `QL_*` overrides.
    pub fn from_env() -> Result<Self> {
        let vars: Vec<(String, String)> = std::env::vars()
            .filter(|(key, _)| key.starts_with(constants::ENV_PREFIX))
            .collect();
        let base = match vars.iter().find(|(key, _)| key == ENV_POLICY_FILE) {
            Some((_, path)) => Self::load(Path::new(path))?,
            None => Self::default(),
        };
        base.with_overrides(vars)
    }

    /// Apply `QL_*` key/value overrides and re-validate.
    ///
    /// Keys that are not recognised are ignored. A recognised key with an
    /// unparsable value is a configuration error.
    pub fn with_overrides<I, K, V>(mut self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            match key {
                "QL_QUORUM_THRESHOLD" => self.consensus.quorum_threshold = parse(key, value)?,
                "QL_HEALTHY_RATIO" => self.consensus.health.healthy = parse(key, value)?,
                "QL_DEGRADED_RATIO" => self.consensus.health.degraded = parse(key, value)?,
                "QL_BREAKER_THRESHOLD" => self.risk.breaker_threshold = parse(key, value)?,
                "QL_EXPOSURE_SAFETY_MARGIN_CENTS" => {
                    self.risk.safety_margin_cents = parse(key, value)?;
                }
                "QL_MIN_TOKEN_LENGTH" => self.security.min_token_length = parse(key, value)?,
                "QL_OUTAGE_MINOR_MINUTES" => self.resilience.minor_minutes = parse(key, value)?,
                "QL_OUTAGE_MAJOR_MINUTES" => self.resilience.major_minutes = parse(key, value)?,
                _ => {}
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Check every cross-field invariant the engines rely on.
    pub fn validate(&self) -> Result<()> {
        let unit = Decimal::ZERO..=Decimal::ONE;

        let consensus = &self.consensus;
        if !unit.contains(&consensus.quorum_threshold) {
            return Err(invalid(format!(
                "quorum_threshold {} outside [0, 1]",
                consensus.quorum_threshold
            )));
        }
        let bands = &consensus.health;
        if !unit.contains(&bands.healthy) || !unit.contains(&bands.degraded) {
            return Err(invalid("health bands must lie in [0, 1]".into()));
        }
        if bands.healthy <= bands.degraded {
            return Err(invalid(format!(
                "healthy band {} must be above degraded band {}",
                bands.healthy, bands.degraded
            )));
        }

        let risk = &self.risk;
        if risk.exposure_weight.is_sign_negative()
            || risk.incident_weight.is_sign_negative()
            || risk.volatility_weight.is_sign_negative()
        {
            return Err(invalid("risk weights must be non-negative".into()));
        }
        let tiers = &risk.tiers;
        if !(Decimal::ZERO < tiers.medium && tiers.medium < tiers.high && tiers.high < tiers.critical)
        {
            return Err(invalid(
                "risk tier thresholds must be positive and strictly increasing".into(),
            ));
        }
        let limits = &risk.exposure_limits;
        if !(limits.low > limits.medium && limits.medium > limits.high && limits.high > limits.critical)
        {
            return Err(invalid(
                "exposure limits must strictly decrease with tier severity".into(),
            ));
        }
        if risk.safety_margin_cents <= 0 || risk.safety_margin_cents >= limits.critical {
            return Err(invalid(format!(
                "safety margin {} must be positive and below the critical limit {}",
                risk.safety_margin_cents, limits.critical
            )));
        }

        let security = &self.security;
        if security.min_token_length == 0 {
            return Err(invalid("min_token_length must be at least 1".into()));
        }
        for (name, role) in &security.roles {
            if name.is_empty() || *name != normalize_role(name) {
                return Err(invalid(format!(
                    "role key {name:?} must be non-empty, trimmed and lowercase"
                )));
            }
            if role.level == constants::UNKNOWN_ROLE_LEVEL || role.step_up_threshold_cents < 0 {
                return Err(invalid(format!(
                    "role {name:?} needs a level above {} and a non-negative threshold",
                    constants::UNKNOWN_ROLE_LEVEL
                )));
            }
        }
        let mut by_level: Vec<&RolePolicy> = security.roles.values().collect();
        by_level.sort_by_key(|r| r.level);
        if by_level
            .windows(2)
            .any(|w| w[1].step_up_threshold_cents < w[0].step_up_threshold_cents)
        {
            return Err(invalid(
                "step-up thresholds must not decrease as permission level rises".into(),
            ));
        }

        let res = &self.resilience;
        if !(0 < res.minor_minutes && res.minor_minutes < res.major_minutes) {
            return Err(invalid(
                "outage duration bands must be positive and increasing".into(),
            ));
        }
        if !(0 < res.some_services && res.some_services < res.wide_services) {
            return Err(invalid(
                "outage breadth bands must be positive and increasing".into(),
            ));
        }
        let rec = &res.recovery;
        if !(rec.negligible < rec.minor && rec.minor < rec.major && rec.major < rec.critical) {
            return Err(invalid(
                "recovery times must strictly increase with outage severity".into(),
            ));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> QuorumLedgerError {
    QuorumLedgerError::Configuration(reason)
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| QuorumLedgerError::Configuration(format!("{key}={value:?}: {e}")))
}
