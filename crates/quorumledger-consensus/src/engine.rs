//! `ConsensusEngine`: the free functions bound to a validated policy.

use std::collections::HashSet;

use quorumledger_types::{
    ConsensusPolicy, HealthStatus, Node, NodeId, PolicyConfig, QuorumLedgerError, QuorumVote,
    Result,
};

use crate::leader;
use crate::quorum::{self, Tally};
use crate::replay::{self, ReplayEvent};

/// Stateless consensus decisions under one [`ConsensusPolicy`].
#[derive(Debug, Clone, Default)]
pub struct ConsensusEngine {
    policy: ConsensusPolicy,
}

impl ConsensusEngine {
    #[must_use]
    pub fn new(policy: ConsensusPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.consensus.clone())
    }

    #[must_use]
    pub fn policy(&self) -> &ConsensusPolicy {
        &self.policy
    }

    /// [`quorum::check_quorum`] at the configured threshold.
    #[must_use]
    pub fn quorum_reached(&self, votes: &[QuorumVote]) -> bool {
        quorum::check_quorum(votes, self.policy.quorum_threshold)
    }

    /// Guard form of [`Self::quorum_reached`].
    ///
    /// # Errors
    /// [`QuorumLedgerError::QuorumNotReached`] with the tally that fell short.
    pub fn require_quorum(&self, votes: &[QuorumVote]) -> Result<()> {
        if self.quorum_reached(votes) {
            return Ok(());
        }
        let tally = Tally::of(votes);
        Err(QuorumLedgerError::QuorumNotReached {
            approved: tally.approved,
            voters: tally.voters,
        })
    }

    #[must_use]
    pub fn health(&self, votes: &[QuorumVote], total_nodes: usize) -> HealthStatus {
        quorum::health_status(votes, total_nodes, &self.policy.health)
    }

    #[must_use]
    pub fn elect_leader(&self, candidates: &[NodeId], degraded: &HashSet<NodeId>) -> Vec<NodeId> {
        leader::elect_leader(candidates, degraded)
    }

    /// First eligible node in input order.
    ///
    /// # Errors
    /// [`QuorumLedgerError::NoEligibleLeader`] when every node is degraded or
    /// `nodes` is empty.
    pub fn leader(&self, nodes: &[Node]) -> Result<NodeId> {
        leader::eligible_leaders(nodes)
            .into_iter()
            .next()
            .ok_or(QuorumLedgerError::NoEligibleLeader)
    }

    #[must_use]
    pub fn reconcile<I>(&self, events: I) -> Vec<ReplayEvent>
    where
        I: IntoIterator<Item = ReplayEvent>,
    {
        replay::replay(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn default_threshold_is_two_thirds_ish() {
        let engine = ConsensusEngine::default();
        assert_eq!(engine.policy().quorum_threshold, Decimal::new(66, 2));
        assert!(engine.quorum_reached(&QuorumVote::dummy_set(2, 1)));
        assert!(!engine.quorum_reached(&QuorumVote::dummy_set(1, 1)));
    }

    #[test]
    fn require_quorum_reports_tally() {
        let engine = ConsensusEngine::from_config(&PolicyConfig::default());
        assert!(engine.require_quorum(&QuorumVote::dummy_set(3, 0)).is_ok());

        let err = engine.require_quorum(&QuorumVote::dummy_set(1, 2)).unwrap_err();
        assert!(
            matches!(err, QuorumLedgerError::QuorumNotReached { approved: 1, voters: 3 }),
            "Expected QuorumNotReached, got: {err:?}"
        );
        assert!(err.to_string().starts_with("QL_ERR_201"));
    }

    #[test]
    fn empty_vote_set_fails_guard() {
        let engine = ConsensusEngine::default();
        let err = engine.require_quorum(&[]).unwrap_err();
        assert!(matches!(err, QuorumLedgerError::QuorumNotReached { approved: 0, voters: 0 }));
    }

    #[test]
    fn leader_is_first_healthy_node() {
        let engine = ConsensusEngine::default();
        let nodes = vec![Node::new("b", true), Node::new("c", false), Node::new("a", false)];
        assert_eq!(engine.leader(&nodes).unwrap(), NodeId::from("c"));
    }

    #[test]
    fn no_leader_when_all_degraded() {
        let engine = ConsensusEngine::default();
        let nodes = vec![Node::new("a", true), Node::new("b", true)];
        assert!(matches!(
            engine.leader(&nodes),
            Err(QuorumLedgerError::NoEligibleLeader)
        ));
        assert!(matches!(engine.leader(&[]), Err(QuorumLedgerError::NoEligibleLeader)));
    }

    #[test]
    fn health_uses_configured_bands() {
        let mut config = PolicyConfig::default();
        config.consensus.health.healthy = Decimal::new(9, 1);
        let engine = ConsensusEngine::from_config(&config);
        // 2 / (2 + 1) clears the default band but not 0.9.
        let votes = QuorumVote::dummy_set(2, 0);
        assert_eq!(engine.health(&votes, 2), HealthStatus::Degraded);
        assert_eq!(ConsensusEngine::default().health(&votes, 2), HealthStatus::Healthy);
    }

    #[test]
    fn reconcile_delegates_to_replay() {
        let engine = ConsensusEngine::default();
        let out = engine.reconcile(vec![
            ReplayEvent::new("x", 2, "late"),
            ReplayEvent::new("x", 1, "early"),
        ]);
        assert_eq!(out, vec![ReplayEvent::new("x", 2, "late")]);
    }

    #[test]
    fn elect_leader_matches_free_fn() {
        let engine = ConsensusEngine::default();
        let candidates = vec![NodeId::from("n1"), NodeId::from("n2")];
        let degraded: HashSet<NodeId> = [NodeId::from("n1")].into_iter().collect();
        assert_eq!(engine.elect_leader(&candidates, &degraded), vec![NodeId::from("n2")]);
    }
}
