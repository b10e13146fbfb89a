//! Ledger entry model.
//!
//! Maps to the logical table
//! `ledger_entries(entry_id PK, account, amount_cents, currency, sequence, created_at)`.
//!
//! Entries are append-only: created when a settlement window commits,
//! never mutated, never deleted. `sequence` is strictly increasing per
//! account; a balanced transaction is a set of entries whose `amount_cents`
//! sum to zero per currency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Account, Currency, EntryId};

/// A single immutable posting against one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Globally unique entry identifier.
    pub entry_id: EntryId,
    /// Account the posting applies to.
    pub account: Account,
    /// Signed amount in minor units. Negative = debit, positive = credit.
    pub amount_cents: i64,
    /// Currency code.
    pub currency: Currency,
    /// Per-account sequence number.
    pub sequence: u64,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Build a new entry stamped with a fresh ID and the current time.
    #[must_use]
    pub fn new(
        account: impl Into<Account>,
        amount_cents: i64,
        currency: impl Into<Currency>,
        sequence: u64,
    ) -> Self {
        Self {
            entry_id: EntryId::new(),
            account: account.into(),
            amount_cents,
            currency: currency.into(),
            sequence,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_debit(&self) -> bool {
        self.amount_cents < 0
    }
}
