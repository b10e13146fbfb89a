//! Quorum evaluation and cluster health classification.
//!
//! Both functions compute an approval ratio but over different
//! denominators:
//!
//! - [`check_quorum`] divides by the number of distinct nodes that voted.
//! - [`health_status`] divides by `total_nodes + 1`: the local node counts
//!   itself as a member even though it never casts a visible vote.
//!
//! Keep the two denominators separate.

use std::collections::BTreeSet;

use quorumledger_types::{EpochId, HealthBands, HealthStatus, NodeId, QuorumVote};
use rust_decimal::Decimal;

/// Approval counts over a vote set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    /// Votes with `approved == true`. Every such vote counts, so a node
    /// approving in two epochs contributes two.
    pub approved: usize,
    /// Distinct nodes that voted at all.
    pub voters: usize,
}

impl Tally {
    #[must_use]
    pub fn of(votes: &[QuorumVote]) -> Self {
        let voters: BTreeSet<&NodeId> = votes.iter().map(|vote| &vote.node_id).collect();
        Self {
            approved: votes.iter().filter(|vote| vote.approved).count(),
            voters: voters.len(),
        }
    }

    /// `approved / voters`, or `None` when nobody voted.
    #[must_use]
    pub fn ratio(&self) -> Option<Decimal> {
        (self.voters > 0).then(|| Decimal::from(self.approved) / Decimal::from(self.voters))
    }
}

/// Whether approved votes divided by distinct voting nodes reaches
/// `threshold`.
///
/// - Empty vote set → `false`.
/// - `threshold` outside `[0, 1]` → `false` (rejected input).
/// - Votes are **not** filtered by epoch; use [`votes_for_epoch`] first when
///   the set may span epochs.
#[must_use]
pub fn check_quorum(votes: &[QuorumVote], threshold: Decimal) -> bool {
    if threshold < Decimal::ZERO || threshold > Decimal::ONE {
        tracing::debug!(%threshold, "quorum threshold outside [0, 1]");
        return false;
    }
    let tally = Tally::of(votes);
    let reached = tally.ratio().is_some_and(|ratio| ratio >= threshold);
    tracing::debug!(
        approved = tally.approved,
        voters = tally.voters,
        %threshold,
        reached,
        "quorum evaluated"
    );
    reached
}

/// Classify cluster health from approved votes out of `total_nodes + 1`.
#[must_use]
pub fn health_status(votes: &[QuorumVote], total_nodes: usize, bands: &HealthBands) -> HealthStatus {
    let tally = Tally::of(votes);
    let members = Decimal::from(total_nodes) + Decimal::ONE;
    let ratio = Decimal::from(tally.approved) / members;
    let status = bands.classify(ratio);
    tracing::debug!(approved = tally.approved, total_nodes, %ratio, %status, "cluster health");
    status
}

/// Votes belonging to `epoch`, in input order.
#[must_use]
pub fn votes_for_epoch(votes: &[QuorumVote], epoch: EpochId) -> Vec<QuorumVote> {
    votes.iter().filter(|v| v.epoch == epoch).cloned().collect()
}
