//! Quorum vote and node models.
//!
//! A [`QuorumVote`] maps to the logical table
//! `quorum_votes(vote_id PK, node_id, epoch, approved, created_at)`.
//! At most one vote exists per `(node_id, epoch)`; votes are never mutated.
//!
//! A [`Node`] is transient: the caller supplies it per decision and the core
//! never caches it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EpochId, NodeId, VoteId};

/// One node's decision for one epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumVote {
    pub vote_id: VoteId,
    pub node_id: NodeId,
    pub epoch: EpochId,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl QuorumVote {
    #[must_use]
    pub fn new(node_id: impl Into<NodeId>, epoch: EpochId, approved: bool) -> Self {
        Self {
            vote_id: VoteId::new(),
            node_id: node_id.into(),
            epoch,
            approved,
            created_at: Utc::now(),
        }
    }
}

/// Current leadership eligibility of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub node_id: NodeId,
    pub degraded: bool,
}

impl Node {
    #[must_use]
    pub fn new(node_id: impl Into<NodeId>, degraded: bool) -> Self {
        Self {
            node_id: node_id.into(),
            degraded,
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl QuorumVote {
    /// `approved` votes for epoch 1 from `node-0 .. node-{approved-1}`, followed
    /// by rejecting votes from the next `rejected` nodes.
    pub fn dummy_set(approved: usize, rejected: usize) -> Vec<Self> {
        (0..approved + rejected)
            .map(|i| Self::new(format!("node-{i}"), EpochId(1), i < approved))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_set_shape() {
        let votes = QuorumVote::dummy_set(2, 3);
        assert_eq!(votes.len(), 5);
        assert_eq!(votes.iter().filter(|v| v.approved).count(), 2);
        assert!(votes.iter().all(|v| v.epoch == EpochId(1)));
    }

    #[test]
    fn vote_serde_roundtrip() {
        let vote = QuorumVote::new("node-a", EpochId(9), true);
        let json = serde_json::to_string(&vote).unwrap();
        let back: QuorumVote = serde_json::from_str(&json).unwrap();
        assert_eq!(vote, back);
        assert!(json.contains("\"node_id\":\"node-a\""));
        assert!(json.contains("\"epoch\":9"));
    }
}
