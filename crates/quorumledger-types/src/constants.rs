//! Policy defaults for the QuorumLedger settlement engine.
//!
//! Every value here is only a default: the live value comes from
//! [`PolicyConfig`](crate::PolicyConfig), which callers may override from a
//! policy file or the environment.

/// Decimal scale of the `_BPS` constants (10,000 bps == 1.0).
pub const BPS_SCALE: u32 = 4;

/// Default approval fraction required for quorum, in basis points (0.66).
pub const DEFAULT_QUORUM_THRESHOLD_BPS: i64 = 6_600;

/// Health band: ratio at or above which the cluster is healthy (0.66).
pub const DEFAULT_HEALTHY_RATIO_BPS: i64 = 6_600;

/// Health band: ratio at or above which the cluster is degraded (0.33).
pub const DEFAULT_DEGRADED_RATIO_BPS: i64 = 3_300;

/// Risk score contribution per one million cents of exposure.
pub const DEFAULT_EXPOSURE_WEIGHT: i64 = 2;

/// Risk score contribution per recorded incident.
pub const DEFAULT_INCIDENT_WEIGHT: i64 = 5;

/// Risk score contribution per unit of volatility.
pub const DEFAULT_VOLATILITY_WEIGHT: i64 = 30;

/// Exposure unit (cents) that one `exposure_weight` step is measured against.
pub const EXPOSURE_UNIT_CENTS: i64 = 1_000_000;

/// Risk score at which a position becomes MEDIUM tier.
pub const DEFAULT_MEDIUM_RISK_SCORE: i64 = 25;

/// Risk score at which a position becomes HIGH tier.
pub const DEFAULT_HIGH_RISK_SCORE: i64 = 50;

/// Risk score at which a position becomes CRITICAL tier.
pub const DEFAULT_CRITICAL_RISK_SCORE: i64 = 75;

/// Risk score above which the circuit breaker trips.
pub const DEFAULT_BREAKER_THRESHOLD: i64 = 70;

/// Nominal exposure ceiling for LOW tier (500,000.00).
pub const DEFAULT_LOW_EXPOSURE_LIMIT_CENTS: i64 = 50_000_000;

/// Nominal exposure ceiling for MEDIUM tier (200,000.00).
pub const DEFAULT_MEDIUM_EXPOSURE_LIMIT_CENTS: i64 = 20_000_000;

/// Nominal exposure ceiling for HIGH tier (50,000.00).
pub const DEFAULT_HIGH_EXPOSURE_LIMIT_CENTS: i64 = 5_000_000;

/// Nominal exposure ceiling for CRITICAL tier (10,000.00).
pub const DEFAULT_CRITICAL_EXPOSURE_LIMIT_CENTS: i64 = 1_000_000;

/// Safety margin subtracted from every nominal exposure ceiling (1,000.00).
pub const DEFAULT_EXPOSURE_SAFETY_MARGIN_CENTS: i64 = 100_000;

/// Minimum structural token length.
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 16;

/// Permission level assigned to unknown roles.
pub const UNKNOWN_ROLE_LEVEL: u8 = 0;

/// Step-up threshold assigned to unknown roles: any positive amount.
pub const UNKNOWN_ROLE_STEP_UP_CENTS: i64 = 0;

/// Outage duration (minutes) at which an outage stops being short.
pub const DEFAULT_OUTAGE_MINOR_MINUTES: u32 = 15;

/// Outage duration (minutes) at which an outage counts as long.
pub const DEFAULT_OUTAGE_MAJOR_MINUTES: u32 = 60;

/// Affected-service count at which an outage stops being narrow.
pub const DEFAULT_OUTAGE_SOME_SERVICES: u32 = 2;

/// Affected-service count at which an outage counts as wide.
pub const DEFAULT_OUTAGE_WIDE_SERVICES: u32 = 5;

/// Recovery estimates in minutes per outage tier.
pub const DEFAULT_RECOVERY_NEGLIGIBLE_MINUTES: u32 = 5;
pub const DEFAULT_RECOVERY_MINOR_MINUTES: u32 = 30;
pub const DEFAULT_RECOVERY_MAJOR_MINUTES: u32 = 120;
pub const DEFAULT_RECOVERY_CRITICAL_MINUTES: u32 = 480;

/// Prefix for every environment override key.
pub const ENV_PREFIX: &str = "QL_";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "QuorumLedger";
