//! Per-project allocation state.

use std::collections::BTreeMap;

/// Projects keyed by identifier, ordered for stable output.
pub type Registry = BTreeMap<String, ProjectAllocation>;

/// Everything the allocator knows about one project.
///
/// Created by aggregation, completed by evaluation, then mutated in place
/// by each scale/cut round. Entries are never removed; a cut project stays
/// in the registry with a zero amount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectAllocation {
    /// Every accepted pledge amount, in arrival order.
    pub pledge_amounts: Vec<f64>,
    /// Median of `pledge_amounts` (0 when empty).
    pub median_amount: f64,
    /// `pledge_count() >= quorum`; fixed after evaluation.
    pub is_eligible: bool,
    /// Set once the scaled amount falls below the floor; never cleared.
    pub is_cut: bool,
    /// Share of the budget from the latest round.
    pub scaled_amount: f64,
}

impl ProjectAllocation {
    /// Number of accepted pledges.
    pub fn pledge_count(&self) -> usize {
        self.pledge_amounts.len()
    }

    /// Eligible and not cut: takes part in scaling.
    pub fn is_surviving(&self) -> bool {
        self.is_eligible && !self.is_cut
    }

    /// Amount actually paid out: the scaled amount for survivors, 0 otherwise.
    pub fn payout(&self) -> f64 {
        if self.is_surviving() {
            self.scaled_amount
        } else {
            0.0
        }
    }
}
