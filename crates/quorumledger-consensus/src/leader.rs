//! Leader eligibility.
//!
//! Eligibility only: this never checks liveness or holds a lease. The output
//! preserves candidate order so an identical input always yields an
//! identical, auditable ranking.

use std::collections::HashSet;

use quorumledger_types::{Node, NodeId};

/// Candidates not present in `degraded`, in their original order.
#[must_use]
pub fn elect_leader(candidates: &[NodeId], degraded: &HashSet<NodeId>) -> Vec<NodeId> {
    let eligible: Vec<NodeId> = candidates
        .iter()
        .filter(|id| !degraded.contains(*id))
        .cloned()
        .collect();
    if eligible.is_empty() && !candidates.is_empty() {
        tracing::warn!(candidates = candidates.len(), "every leader candidate is degraded");
    }
    eligible
}

/// Same as [`elect_leader`] but driven by each node's own `degraded` flag.
#[must_use]
pub fn eligible_leaders(nodes: &[Node]) -> Vec<NodeId> {
    let candidates: Vec<NodeId> = nodes.iter().map(|n| n.node_id.clone()).collect();
    let degraded: HashSet<NodeId> = nodes
        .iter()
        .filter(|n| n.degraded)
        .map(|n| n.node_id.clone())
        .collect();
    elect_leader(&candidates, &degraded)
}
