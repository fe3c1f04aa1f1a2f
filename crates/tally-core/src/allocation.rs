//! End-to-end allocation: ballots in, per-project results out.

use tracing::{info, warn};

use crate::ballot::{aggregate, AggregationStats, Ballot};
use crate::config::AllocationConfig;
use crate::cutoff::{run, LoopOutcome, Reviewer};
use crate::error::Result;
use crate::median::evaluate;
use crate::project::{ProjectAllocation, Registry};

/// Final state of one project, shaped for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectResult {
    pub project_id: String,
    pub votes: Vec<f64>,
    pub vote_count: usize,
    pub median_amount: f64,
    pub is_eligible: bool,
    pub is_cut: bool,
    /// 0 unless the project is eligible and not cut.
    pub scaled_amount: f64,
}

impl ProjectResult {
    fn from_allocation(project_id: &str, project: &ProjectAllocation) -> Self {
        Self {
            project_id: project_id.to_string(),
            votes: project.pledge_amounts.clone(),
            vote_count: project.pledge_count(),
            median_amount: project.median_amount,
            is_eligible: project.is_eligible,
            is_cut: project.is_cut,
            scaled_amount: project.payout(),
        }
    }

    pub fn is_funded(&self) -> bool {
        self.is_eligible && !self.is_cut && self.scaled_amount > 0.0
    }
}

/// Outcome of the final budget check over surviving projects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AllocationCheck {
    /// Survivors add up to the budget.
    Balanced { allocated: f64 },
    /// Survivors exist but do not add up to the budget.
    Imbalanced { allocated: f64, expected: f64 },
    /// No project receives anything.
    NothingFunded,
}

impl AllocationCheck {
    /// Compare the surviving total against the budget and log the verdict.
    pub fn evaluate(registry: &Registry, config: &AllocationConfig) -> Self {
        let survivors: Vec<&ProjectAllocation> =
            registry.values().filter(|p| p.is_surviving()).collect();
        let allocated: f64 = survivors.iter().map(|p| p.scaled_amount).sum();

        let check = if survivors.is_empty() || allocated == 0.0 {
            AllocationCheck::NothingFunded
        } else if config.allocation_matches(allocated) {
            AllocationCheck::Balanced { allocated }
        } else {
            AllocationCheck::Imbalanced {
                allocated,
                expected: config.total_amount,
            }
        };

        match check {
            AllocationCheck::Balanced { allocated } => info!(
                allocated,
                total = config.total_amount,
                "Total allocated amount matches the budget"
            ),
            AllocationCheck::Imbalanced { allocated, expected } => warn!(
                allocated,
                expected,
                "Total allocated amount does not equal the budget"
            ),
            AllocationCheck::NothingFunded => {
                warn!(total = config.total_amount, "No project received funding")
            }
        }

        check
    }

    pub fn is_balanced(&self) -> bool {
        matches!(self, AllocationCheck::Balanced { .. })
    }
}

/// Everything produced by one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationReport {
    /// One entry per project seen, ordered by project id.
    pub projects: Vec<ProjectResult>,
    pub stats: AggregationStats,
    pub outcome: LoopOutcome,
    pub check: AllocationCheck,
}

impl AllocationReport {
    /// Projects receiving a non-zero amount.
    pub fn funded(&self) -> impl Iterator<Item = &ProjectResult> {
        self.projects.iter().filter(|p| p.is_funded())
    }

    pub fn total_allocated(&self) -> f64 {
        self.projects.iter().map(|p| p.scaled_amount).sum()
    }
}

/// Map the final registry to result records.
pub fn project_results(registry: &Registry) -> Vec<ProjectResult> {
    registry
        .iter()
        .map(|(id, project)| ProjectResult::from_allocation(id, project))
        .collect()
}

/// Run aggregation, evaluation and the cut loop over `ballots`.
///
/// A malformed payload, invalid config, or failed review aborts with an
/// error and no results. Degenerate or unbalanced outcomes still produce a
/// report.
pub fn allocate<R>(
    ballots: &[Ballot],
    config: &AllocationConfig,
    reviewer: &mut R,
) -> Result<AllocationReport>
where
    R: Reviewer + ?Sized,
{
    config.validate()?;

    let (mut registry, stats) = aggregate(ballots)?;
    evaluate(&mut registry, config);

    let eligible = registry.values().filter(|p| p.is_eligible).count();
    info!(
        projects = registry.len(),
        eligible,
        quorum = config.quorum,
        "Evaluated medians and eligibility"
    );

    let outcome = run(&mut registry, config, reviewer)?;
    let check = AllocationCheck::evaluate(&registry, config);

    Ok(AllocationReport {
        projects: project_results(&registry),
        stats,
        outcome,
        check,
    })
}
