//! Vote registry: enforces at most one vote per `(node_id, epoch)`.
//!
//! Reference implementation of the `quorum_votes` uniqueness constraint.
//! Resubmitting the same decision is idempotent; a conflicting decision
//! for an already-voted `(node_id, epoch)` is rejected with
//! [`QuorumLedgerError::DuplicateVote`].
//!
//! Safe to share across threads: the check-and-insert for one
//! `(node_id, epoch)` happens under that key's shard lock.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use quorumledger_types::{EpochId, NodeId, QuorumLedgerError, QuorumVote, Result, VoteId};
use rust_decimal::Decimal;

use crate::quorum::check_quorum;

/// Result of a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First vote for this `(node_id, epoch)`; stored.
    Recorded,
    /// Same decision already on file; nothing changed.
    AlreadyRecorded,
}

/// Concurrent store of quorum votes keyed by `(node_id, epoch)`.
#[derive(Debug, Default)]
pub struct VoteRegistry {
    votes: DashMap<(NodeId, EpochId), QuorumVote>,
    /// Secondary index enforcing `vote_id` as a primary key.
    vote_ids: DashMap<VoteId, (NodeId, EpochId)>,
}

impl VoteRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote (upsert-or-reject).
    ///
    /// # Errors
    /// - [`QuorumLedgerError::DuplicateVote`] if this node already voted the
    ///   other way in this epoch.
    /// - [`QuorumLedgerError::VoteIdReused`] if `vote_id` is already bound to
    ///   a different `(node_id, epoch)`.
    pub fn submit(&self, vote: QuorumVote) -> Result<VoteOutcome> {
        let key = (vote.node_id.clone(), vote.epoch);
        match self.votes.entry(key.clone()) {
            Entry::Occupied(existing) => {
                if existing.get().approved == vote.approved {
                    return Ok(VoteOutcome::AlreadyRecorded);
                }
                tracing::warn!(
                    node = %vote.node_id,
                    epoch = %vote.epoch,
                    "conflicting vote rejected"
                );
                Err(QuorumLedgerError::DuplicateVote {
                    node_id: vote.node_id,
                    epoch: vote.epoch,
                })
            }
            Entry::Vacant(slot) => {
                match self.vote_ids.entry(vote.vote_id) {
                    Entry::Occupied(_) => return Err(QuorumLedgerError::VoteIdReused(vote.vote_id)),
                    Entry::Vacant(id_slot) => {
                        id_slot.insert(key);
                    }
                }
                tracing::info!(
                    node = %vote.node_id,
                    epoch = %vote.epoch,
                    approved = vote.approved,
                    "vote recorded"
                );
                slot.insert(vote);
                Ok(VoteOutcome::Recorded)
            }
        }
    }

    /// All votes cast in `epoch`, ordered by node id.
    #[must_use]
    pub fn votes_for_epoch(&self, epoch: EpochId) -> Vec<QuorumVote> {
        let mut votes: Vec<QuorumVote> = self
            .votes
            .iter()
            .filter(|entry| entry.key().1 == epoch)
            .map(|entry| entry.value().clone())
            .collect();
        votes.sort_by(|a, b| a.node_id.cmp(&b.node_id));
        votes
    }

    /// Whether the votes recorded for `epoch` reach `threshold`.
    #[must_use]
    pub fn epoch_decided(&self, epoch: EpochId, threshold: Decimal) -> bool {
        check_quorum(&self.votes_for_epoch(epoch), threshold)
    }

    /// The vote recorded for `(node_id, epoch)`, if any.
    #[must_use]
    pub fn get(&self, node_id: &NodeId, epoch: EpochId) -> Option<QuorumVote> {
        self.votes
            .get(&(node_id.clone(), epoch))
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}
