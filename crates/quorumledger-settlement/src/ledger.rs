//! Append-only ledger store.
//!
//! In-memory reference store for `ledger_entries`. It enforces the
//! persistence invariants the rest of the engine relies on:
//!
//! 1. **Unique entries**: an `entry_id` is accepted once. A replayed write
//!    is rejected with [`QuorumLedgerError::DuplicateEntry`].
//! 2. **Per-account ordering**: each account's `sequence` strictly
//!    increases. Gaps are allowed; reuse and regression are not.
//! 3. **Balance**: a transaction's postings sum to zero per currency.
//! 4. **All-or-nothing**: a rejected transaction leaves no trace.
//!
//! ## Concurrency
//!
//! Each account sits behind its own `Mutex` inside a `DashMap`, so writers
//! to the same account serialize while different accounts proceed in
//! parallel. A multi-account transaction locks its accounts in sorted
//! order, which rules out lock-order deadlocks between transactions.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use quorumledger_types::{Account, EntryId, LedgerEntry, QuorumLedgerError, Result};

#[derive(Debug, Default)]
struct AccountLedger {
    last_sequence: Option<u64>,
    entries: Vec<LedgerEntry>,
}

type Handle = Arc<Mutex<AccountLedger>>;
type Locked<'a> = BTreeMap<&'a str, MutexGuard<'a, AccountLedger>>;

/// Check that `entries` net to zero in every currency.
///
/// # Errors
/// [`QuorumLedgerError::UnbalancedTransaction`] naming the first currency
/// (alphabetically) whose postings do not cancel out.
pub fn verify_balanced(entries: &[LedgerEntry]) -> Result<()> {
    let mut net: BTreeMap<&str, i128> = BTreeMap::new();
    for entry in entries {
        *net.entry(entry.currency.as_str()).or_insert(0) += i128::from(entry.amount_cents);
    }
    match net.into_iter().find(|(_, sum)| *sum != 0) {
        None => Ok(()),
        Some((currency, sum)) => Err(QuorumLedgerError::UnbalancedTransaction {
            currency: currency.to_string(),
            net_cents: i64::try_from(sum).unwrap_or(if sum > 0 { i64::MAX } else { i64::MIN }),
        }),
    }
}

/// Concurrent append-only ledger.
#[derive(Debug, Default)]
pub struct LedgerStore {
    accounts: DashMap<Account, Handle>,
    /// Every accepted entry id and the account it was posted to.
    entry_ids: DashMap<EntryId, Account>,
}

impl LedgerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry with a caller-chosen sequence. No balance check.
    ///
    /// # Errors
    /// - [`QuorumLedgerError::SequenceConflict`] if `sequence` is not above
    ///   the account's last sequence.
    /// - [`QuorumLedgerError::DuplicateEntry`] if `entry_id` was seen before.
    pub fn append_entry(&self, entry: LedgerEntry) -> Result<()> {
        self.commit(vec![entry])
    }

    /// Append a balanced set of entries atomically.
    ///
    /// Several entries may target the same account; their sequences must
    /// then increase in the order given.
    ///
    /// # Errors
    /// - [`QuorumLedgerError::InvalidInput`] for an empty transaction.
    /// - [`QuorumLedgerError::UnbalancedTransaction`] if it does not net to zero.
    /// - Any error of [`Self::append_entry`]. Nothing is written on error.
    pub fn commit_transaction(&self, entries: Vec<LedgerEntry>) -> Result<()> {
        if entries.is_empty() {
            return Err(QuorumLedgerError::InvalidInput {
                reason: "transaction has no entries".to_string(),
            });
        }
        verify_balanced(&entries)?;
        self.commit(entries)
    }

    /// Post `amount_cents` from `from` to `to`, assigning each side the next
    /// sequence of its account under lock. Returns `[debit, credit]`.
    ///
    /// # Errors
    /// [`QuorumLedgerError::InvalidInput`] for a non-positive amount or a
    /// self-transfer.
    pub fn transfer(&self, from: &str, to: &str, amount_cents: i64, currency: &str) -> Result<Vec<LedgerEntry>> {
        if amount_cents <= 0 {
            return Err(QuorumLedgerError::InvalidInput {
                reason: format!("transfer amount must be positive, got {amount_cents}"),
            });
        }
        if from == to {
            return Err(QuorumLedgerError::InvalidInput {
                reason: format!("transfer from {from} to itself"),
            });
        }
        let handles = self.handles([from, to]);
        let mut locked = lock_all(&handles)?;
        let next = |account: &str| {
            locked
                .get(account)
                .map_or(1, |ledger| next_after(ledger.last_sequence))
        };
        let entries = vec![
            LedgerEntry::new(from, -amount_cents, currency, next(from)),
            LedgerEntry::new(to, amount_cents, currency, next(to)),
        ];
        self.store_locked(&mut locked, entries.clone())?;
        Ok(entries)
    }

    /// Append a single posting at the account's next sequence.
    ///
    /// # Errors
    /// Only on internal failure; the sequence cannot conflict.
    pub fn append_next(&self, account: &str, amount_cents: i64, currency: &str) -> Result<LedgerEntry> {
        let handles = self.handles([account]);
        let mut locked = lock_all(&handles)?;
        let sequence = locked
            .get(account)
            .map_or(1, |ledger| next_after(ledger.last_sequence));
        let entry = LedgerEntry::new(account, amount_cents, currency, sequence);
        self.store_locked(&mut locked, vec![entry.clone()])?;
        Ok(entry)
    }

    /// Sequence the next entry for `account` should carry (1 for a new account).
    ///
    /// # Errors
    /// [`QuorumLedgerError::Internal`] if the account's lock is poisoned.
    pub fn next_sequence(&self, account: &str) -> Result<u64> {
        let next = self.read(account, |ledger| next_after(ledger.last_sequence))?;
        Ok(next.unwrap_or(1))
    }

    /// All entries for `account`, in sequence order.
    ///
    /// # Errors
    /// [`QuorumLedgerError::Internal`] if the account's lock is poisoned.
    pub fn entries(&self, account: &str) -> Result<Vec<LedgerEntry>> {
        let entries = self.read(account, |ledger| ledger.entries.clone())?;
        Ok(entries.unwrap_or_default())
    }

    /// Net of all postings to `account` in `currency`.
    ///
    /// # Errors
    /// [`QuorumLedgerError::Internal`] if the account's lock is poisoned.
    pub fn balance(&self, account: &str, currency: &str) -> Result<i64> {
        let balance = self.read(account, |ledger| {
            ledger
                .entries
                .iter()
                .filter(|e| e.currency == currency)
                .fold(0i64, |sum, e| sum.saturating_add(e.amount_cents))
        })?;
        Ok(balance.unwrap_or(0))
    }

    #[must_use]
    pub fn contains(&self, entry_id: &EntryId) -> bool {
        self.entry_ids.contains_key(entry_id)
    }

    /// Total number of entries across all accounts.
    pub fn len(&self) -> usize {
        self.entry_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_ids.is_empty()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn commit(&self, entries: Vec<LedgerEntry>) -> Result<()> {
        let handles = self.handles(entries.iter().map(|e| e.account.as_str()));
        let mut locked = lock_all(&handles)?;
        self.store_locked(&mut locked, entries)
    }

    /// Per-account handles for `accounts`, deduplicated and sorted.
    fn handles<'a>(&self, accounts: impl IntoIterator<Item = &'a str>) -> Vec<(Account, Handle)> {
        let names: BTreeSet<&str> = accounts.into_iter().collect();
        names
            .into_iter()
            .map(|name| {
                let handle = self.accounts.entry(name.to_string()).or_default().value().clone();
                (name.to_string(), handle)
            })
            .collect()
    }

    /// Run `f` over `account` under its lock. `Ok(None)` for an unknown account.
    fn read<T>(&self, account: &str, f: impl FnOnce(&AccountLedger) -> T) -> Result<Option<T>> {
        let Some(handle) = self.accounts.get(account).map(|h| h.value().clone()) else {
            return Ok(None);
        };
        let ledger = handle.lock().map_err(|_| {
            tracing::warn!(account, "ledger lock poisoned on read");
            QuorumLedgerError::Internal(format!("ledger lock poisoned for {account}"))
        })?;
        Ok(Some(f(&ledger)))
    }

    /// Validate and apply `entries` against already-locked accounts.
    fn store_locked(&self, locked: &mut Locked<'_>, entries: Vec<LedgerEntry>) -> Result<()> {
        let mut last_seen: BTreeMap<&str, Option<u64>> = locked
            .iter()
            .map(|(account, ledger)| (*account, ledger.last_sequence))
            .collect();
        for entry in &entries {
            let Some(last) = last_seen.get_mut(entry.account.as_str()) else {
                return Err(QuorumLedgerError::Internal(format!(
                    "account {} not locked",
                    entry.account
                )));
            };
            if last.is_some_and(|prev| entry.sequence <= prev) {
                tracing::warn!(
                    account = %entry.account,
                    sequence = entry.sequence,
                    last = ?last,
                    "sequence conflict; transaction rejected"
                );
                return Err(QuorumLedgerError::SequenceConflict {
                    account: entry.account.clone(),
                    sequence: entry.sequence,
                    last: *last,
                });
            }
            *last = Some(entry.sequence);
        }

        self.reserve_ids(&entries)?;

        let count = entries.len();
        for entry in entries {
            if let Some(ledger) = locked.get_mut(entry.account.as_str()) {
                ledger.last_sequence = Some(entry.sequence);
                ledger.entries.push(entry);
            }
        }
        tracing::info!(entries = count, accounts = locked.len(), "ledger transaction committed");
        Ok(())
    }

    /// Claim every entry id or none of them.
    fn reserve_ids(&self, entries: &[LedgerEntry]) -> Result<()> {
        let mut reserved = Vec::with_capacity(entries.len());
        for entry in entries {
            let claimed = match self.entry_ids.entry(entry.entry_id) {
                Entry::Occupied(_) => false,
                Entry::Vacant(slot) => {
                    slot.insert(entry.account.clone());
                    true
                }
            };
            if !claimed {
                for id in &reserved {
                    self.entry_ids.remove(id);
                }
                tracing::warn!(entry_id = %entry.entry_id, "duplicate ledger entry rejected");
                return Err(QuorumLedgerError::DuplicateEntry(entry.entry_id));
            }
            reserved.push(entry.entry_id);
        }
        Ok(())
    }
}

fn next_after(last: Option<u64>) -> u64 {
    last.map_or(1, |seq| seq.saturating_add(1))
}

fn lock_all(handles: &[(Account, Handle)]) -> Result<Locked<'_>> {
    handles
        .iter()
        .map(|(account, handle)| {
            handle
                .lock()
                .map(|guard| (account.as_str(), guard))
                .map_err(|_| QuorumLedgerError::Internal(format!("ledger lock poisoned for {account}")))
        })
        .collect()
}
