//! Event stream reconciliation after a partition heals.
//!
//! [`replay`] is a pure fold into a map keyed by event id that keeps, per
//! id, the event with the highest `sequence`. When two events share id and
//! sequence, the one with the lexicographically greatest payload wins. The
//! rule depends only on the events themselves, so the merge is commutative
//! (input order never matters) and idempotent (replaying a replayed stream
//! changes nothing).
//!
//! [`replay_root`] commits to a reconciled stream so nodes can confirm they
//! converged without exchanging full payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One versioned event in a node's stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplayEvent {
    pub event_id: String,
    pub sequence: u64,
    pub payload: String,
}

impl ReplayEvent {
    #[must_use]
    pub fn new(event_id: impl Into<String>, sequence: u64, payload: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            sequence,
            payload: payload.into(),
        }
    }

    /// Whether `self` should replace `other` for the same event id.
    fn supersedes(&self, other: &Self) -> bool {
        (self.sequence, &self.payload) > (other.sequence, &other.payload)
    }
}

/// Reconcile one or more event streams. Output is ordered by `event_id`.
#[must_use]
pub fn replay<I>(events: I) -> Vec<ReplayEvent>
where
    I: IntoIterator<Item = ReplayEvent>,
{
    let mut latest: BTreeMap<String, ReplayEvent> = BTreeMap::new();
    let mut seen = 0usize;
    for event in events {
        seen += 1;
        let keep_current = latest
            .get(&event.event_id)
            .is_some_and(|current| !event.supersedes(current));
        if !keep_current {
            latest.insert(event.event_id.clone(), event);
        }
    }
    tracing::debug!(input = seen, retained = latest.len(), "event streams reconciled");
    latest.into_values().collect()
}

/// SHA-256 commitment over a reconciled stream, in the given order.
#[must_use]
pub fn replay_root(events: &[ReplayEvent]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"quorumledger:replay_root:v1:");
    hasher.update((events.len() as u64).to_le_bytes());

    for event in events {
        // Length-prefix variable fields so boundaries are unambiguous.
        hasher.update((event.event_id.len() as u64).to_le_bytes());
        hasher.update(event.event_id.as_bytes());
        hasher.update(event.sequence.to_le_bytes());
        hasher.update((event.payload.len() as u64).to_le_bytes());
        hasher.update(event.payload.as_bytes());
    }

    hasher.finalize().into()
}

/// Hex form of [`replay_root`], for logs and cross-node comparison.
#[must_use]
pub fn replay_root_hex(events: &[ReplayEvent]) -> String {
    hex::encode(replay_root(events))
}

/// Recompute the root for `events` and compare with `expected_root`.
#[must_use]
pub fn verify_replay_root(events: &[ReplayEvent], expected_root: &[u8; 32]) -> bool {
    replay_root(events) == *expected_root
}
