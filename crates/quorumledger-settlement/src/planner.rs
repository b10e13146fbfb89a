//! Settlement planning: batch assignment and window overlap detection.
//!
//! Windows are assigned round-robin in arrival order, so window `i` lands in
//! batch `i % batches`. Urgency does not reorder anything here; callers that
//! want urgent work first sort before planning.

use chrono::{DateTime, Utc};
use quorumledger_types::{NodeId, QuorumLedgerError, Result, SettlementAssignment, SettlementWindow};

/// Round-robin `windows` over `batches` batches. `batches == 0` → empty.
#[must_use]
pub fn plan_settlement(windows: &[SettlementWindow], batches: usize) -> Vec<SettlementAssignment> {
    if batches == 0 {
        return Vec::new();
    }
    windows
        .iter()
        .enumerate()
        .map(|(i, window)| SettlementAssignment {
            window_id: window.window_id.clone(),
            batch_index: i % batches,
        })
        .collect()
}

/// Whether any two non-empty windows share an instant.
///
/// Sorts by start and compares each start with the running maximum end.
/// Intervals are half-open, so `[a, b)` and `[b, c)` do not overlap.
#[must_use]
pub fn window_overlap(windows: &[SettlementWindow]) -> bool {
    let mut spans: Vec<&SettlementWindow> = windows.iter().filter(|w| !w.is_empty()).collect();
    spans.sort_by_key(|w| w.start);

    let mut max_end: Option<DateTime<Utc>> = None;
    for window in spans {
        if max_end.is_some_and(|end| window.start < end) {
            return true;
        }
        max_end = max_end.max(Some(window.end));
    }
    false
}

/// A plan whose batch `i` is led by `leaders[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementPlan {
    pub assignments: Vec<SettlementAssignment>,
    pub leaders: Vec<NodeId>,
}

impl SettlementPlan {
    /// Leader responsible for `batch_index`.
    #[must_use]
    pub fn leader_for(&self, batch_index: usize) -> Option<&NodeId> {
        self.leaders.get(batch_index)
    }

    /// Window ids in batch `batch_index`, in arrival order.
    #[must_use]
    pub fn batch(&self, batch_index: usize) -> Vec<&str> {
        self.assignments
            .iter()
            .filter(|a| a.batch_index == batch_index)
            .map(|a| a.window_id.as_str())
            .collect()
    }
}

/// Plans batches sized to the set of eligible leaders.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementPlanner;

impl SettlementPlanner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// One batch per eligible leader.
    ///
    /// # Errors
    /// - [`QuorumLedgerError::OverlappingWindows`] if two windows overlap.
    /// - [`QuorumLedgerError::NoEligibleLeader`] if there is work but no
    ///   leader to run it.
    pub fn plan(&self, windows: &[SettlementWindow], eligible_leaders: &[NodeId]) -> Result<SettlementPlan> {
        if window_overlap(windows) {
            tracing::warn!(windows = windows.len(), "settlement windows overlap");
            return Err(QuorumLedgerError::OverlappingWindows);
        }
        if eligible_leaders.is_empty() && !windows.is_empty() {
            return Err(QuorumLedgerError::NoEligibleLeader);
        }
        let assignments = plan_settlement(windows, eligible_leaders.len());
        tracing::debug!(
            windows = windows.len(),
            batches = eligible_leaders.len(),
            "settlement planned"
        );
        Ok(SettlementPlan {
            assignments,
            leaders: eligible_leaders.to_vec(),
        })
    }
}
