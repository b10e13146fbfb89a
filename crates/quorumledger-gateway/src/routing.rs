//! Routing gateway: replica selection, route health and load spreading.
//!
//! All three are deterministic. Replica selection is highest-weight-wins
//! with ties going to the lexicographically smallest node id, so the same
//! inputs always pick the same replica regardless of map iteration order.

use std::collections::HashSet;

use quorumledger_types::{HealthBands, HealthStatus, NodeId, PolicyConfig, WeightedRoute};
use rust_decimal::Decimal;

/// Pick the heaviest non-blocked candidate.
///
/// Accepts any `(node, weight)` iterator, e.g. `&HashMap<NodeId, Decimal>`
/// or `&BTreeMap<NodeId, Decimal>`. Returns `None` when every candidate is
/// blocked or there are none; callers treat that as "no replica right now",
/// not as a failure.
#[must_use]
pub fn select_replica<'a, I>(candidates: I, blocked: &HashSet<NodeId>) -> Option<NodeId>
where
    I: IntoIterator<Item = (&'a NodeId, &'a Decimal)>,
{
    let mut best: Option<(&NodeId, Decimal)> = None;
    for (node, weight) in candidates {
        if blocked.contains(node) {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_node, best_weight)) => {
                *weight > best_weight || (*weight == best_weight && node < best_node)
            }
        };
        if better {
            best = Some((node, *weight));
        }
    }
    let selected = best.map(|(node, _)| node.clone());
    if selected.is_none() {
        tracing::debug!(blocked = blocked.len(), "no eligible replica");
    }
    selected
}

/// Share of route weight that is not blocked, classified against `bands`.
///
/// Negative weights count as zero. Zero total weight is [`HealthStatus::Critical`].
#[must_use]
pub fn route_health(
    routes: &[WeightedRoute],
    blocked: &HashSet<String>,
    bands: &HealthBands,
) -> HealthStatus {
    let total: Decimal = routes.iter().map(WeightedRoute::effective_weight).sum();
    if total.is_zero() {
        return HealthStatus::Critical;
    }
    let available: Decimal = routes
        .iter()
        .filter(|r| !blocked.contains(&r.channel))
        .map(WeightedRoute::effective_weight)
        .sum();
    bands.classify(available / total)
}

/// Split `items` across `channels` as evenly as possible. The first
/// `items % channels` channels get one extra item. `channels == 0` → empty.
#[must_use]
pub fn balanced_distribution(items: usize, channels: usize) -> Vec<usize> {
    if channels == 0 {
        return Vec::new();
    }
    let base = items / channels;
    let remainder = items % channels;
    (0..channels)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Routing decisions under the cluster's configured health bands.
#[derive(Debug, Clone, Default)]
pub struct RoutingGateway {
    bands: HealthBands,
}

impl RoutingGateway {
    #[must_use]
    pub fn new(bands: HealthBands) -> Self {
        Self { bands }
    }

    /// Route health mirrors the consensus health bands.
    #[must_use]
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.consensus.health.clone())
    }

    #[must_use]
    pub fn select_replica<'a, I>(&self, candidates: I, blocked: &HashSet<NodeId>) -> Option<NodeId>
    where
        I: IntoIterator<Item = (&'a NodeId, &'a Decimal)>,
    {
        select_replica(candidates, blocked)
    }

    #[must_use]
    pub fn route_health(&self, routes: &[WeightedRoute], blocked: &HashSet<String>) -> HealthStatus {
        route_health(routes, blocked, &self.bands)
    }

    #[must_use]
    pub fn balanced_distribution(&self, items: usize, channels: usize) -> Vec<usize> {
        balanced_distribution(items, channels)
    }
}
