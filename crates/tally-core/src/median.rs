//! Median pledge and quorum eligibility.
//!
//! The median, not the mean, is each project's funding weight: a handful of
//! extreme pledges cannot drag it far from what most voters asked for.

use crate::config::AllocationConfig;
use crate::project::Registry;

/// Statistical median. Empty input has median 0.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let half = sorted.len() / 2;

    if sorted.len() % 2 == 1 {
        sorted[half]
    } else {
        (sorted[half - 1] + sorted[half]) / 2.0
    }
}

/// Whether a pledge count meets quorum.
pub const fn meets_quorum(pledge_count: usize, quorum: usize) -> bool {
    pledge_count >= quorum
}

/// Fill in median and eligibility, and reset round state, for every project.
pub fn evaluate(registry: &mut Registry, config: &AllocationConfig) {
    for project in registry.values_mut() {
        project.median_amount = median(&project.pledge_amounts);
        project.is_eligible = meets_quorum(project.pledge_count(), config.quorum);
        project.is_cut = false;
        project.scaled_amount = 0.0;
    }
}
