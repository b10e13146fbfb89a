//! Security gate: structural token checks, role permissions and step-up.
//!
//! ## Design Principles
//!
//! - **Structural only**: tokens are checked for shape, never for signature
//!   or issuance. Verification belongs to the identity provider.
//! - **Fail-closed**: an unknown role has level 0 and a step-up threshold of
//!   0, so any positive amount demands step-up.
//! - **One table**: every role decision reads the same keyed
//!   [`SecurityPolicy`] table; there is no fallback path besides
//!   [`RolePolicy::UNKNOWN`].

use quorumledger_types::{PolicyConfig, QuorumLedgerError, Result, RolePolicy, SecurityPolicy};

/// Whether `token` is structurally acceptable: non-empty and at least
/// `min_length` characters (counted as `char`s, not bytes).
#[must_use]
pub fn validate_token(token: &str, min_length: usize) -> bool {
    if token.is_empty() {
        return false;
    }
    token.chars().count() >= min_length
}

/// Outcome of [`SecurityGate::authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Token malformed or role has no permissions.
    Denied,
    /// Caller is known but the amount needs a second factor.
    StepUpRequired,
    Granted,
}

/// Role-table-backed access decisions.
#[derive(Debug, Clone, Default)]
pub struct SecurityGate {
    policy: SecurityPolicy,
}

impl SecurityGate {
    #[must_use]
    pub fn new(policy: SecurityPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.security.clone())
    }

    /// [`validate_token`] at the configured minimum length.
    #[must_use]
    pub fn validate_token(&self, token: &str) -> bool {
        validate_token(token, self.policy.min_token_length)
    }

    /// Permission level for `role` (case-insensitive). Unknown roles → 0.
    #[must_use]
    pub fn permission_level(&self, role: &str) -> u8 {
        self.policy.role(role).level
    }

    /// Whether `amount_cents` is strictly above the role's step-up threshold.
    #[must_use]
    pub fn requires_step_up(&self, role: &str, amount_cents: i64) -> bool {
        amount_cents > self.policy.role(role).step_up_threshold_cents
    }

    /// Token, then permission, then step-up.
    #[must_use]
    pub fn authorize(&self, token: &str, role: &str, amount_cents: i64) -> AccessDecision {
        if !self.validate_token(token) {
            tracing::debug!(role, "token rejected");
            return AccessDecision::Denied;
        }
        let role_policy = self.policy.role(role);
        if role_policy.level == RolePolicy::UNKNOWN.level {
            tracing::debug!(role, "role has no permissions");
            return AccessDecision::Denied;
        }
        if amount_cents > role_policy.step_up_threshold_cents {
            tracing::debug!(role, amount_cents, "step-up required");
            return AccessDecision::StepUpRequired;
        }
        AccessDecision::Granted
    }

    /// Guard form of [`Self::authorize`].
    ///
    /// # Errors
    /// - [`QuorumLedgerError::InvalidInput`] for a denied token or role.
    /// - [`QuorumLedgerError::StepUpRequired`] when the amount needs step-up.
    pub fn require_access(&self, token: &str, role: &str, amount_cents: i64) -> Result<()> {
        match self.authorize(token, role, amount_cents) {
            AccessDecision::Granted => Ok(()),
            AccessDecision::StepUpRequired => Err(QuorumLedgerError::StepUpRequired {
                role: role.to_string(),
                amount_cents,
            }),
            AccessDecision::Denied => Err(QuorumLedgerError::InvalidInput {
                reason: format!("access denied for role '{role}'"),
            }),
        }
    }
}
