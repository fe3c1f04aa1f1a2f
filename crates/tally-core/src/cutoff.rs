//! Cut rounds: scale, drop projects under the floor, repeat.
//!
//! Removing an underfunded project shrinks the denominator for everyone
//! else, so the loop rescales until a round cuts nothing new. The cut set
//! only grows: a cut project leaves the survivor set for good and keeps a
//! zero amount.
//!
//! After every round that cuts something new, the [`Reviewer`] is shown the
//! cut list and the loop blocks until it acknowledges.

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::config::AllocationConfig;
use crate::error::Result;
use crate::project::Registry;
use crate::scale::{scale, ScaleOutcome};

/// A round that cut something new. Shown to the reviewer, then kept in
/// the loop history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutNotice {
    /// 1-based round number.
    pub round: usize,
    /// Every project cut so far.
    pub cut_set: BTreeSet<String>,
    /// Projects cut for the first time this round.
    pub newly_cut: BTreeSet<String>,
}

/// External acknowledgment between cut rounds.
///
/// `review` blocks until the round may proceed. An error aborts the run.
pub trait Reviewer {
    fn review(&mut self, notice: &CutNotice) -> Result<()>;
}

impl<F> Reviewer for F
where
    F: FnMut(&CutNotice) -> Result<()>,
{
    fn review(&mut self, notice: &CutNotice) -> Result<()> {
        self(notice)
    }
}

/// Reviewer that approves every round immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

impl Reviewer for AutoApprove {
    fn review(&mut self, notice: &CutNotice) -> Result<()> {
        info!(
            round = notice.round,
            cut = notice.cut_set.len(),
            "Auto-approving cut round"
        );
        Ok(())
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A round cut nothing new; its amounts are final.
    Converged,
    /// `max_iterations` rounds ran and every one of them cut something new.
    IterationCap,
    /// Scaling had nothing to distribute over; all amounts are zero.
    Degenerate,
}

/// Summary of a finished loop.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopOutcome {
    /// Rounds executed, including the final one.
    pub rounds: usize,
    pub termination: Termination,
    /// Rounds that cut something new, in order.
    pub cut_history: Vec<CutNotice>,
}

/// One scale + cut pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub scale: ScaleOutcome,
    /// All cut projects after this round.
    pub cut_set: BTreeSet<String>,
}

/// Mark eligible projects below `min_amount` as cut and zero them.
///
/// Survivors are re-affirmed, an already-cut project stays cut, and
/// ineligible projects are never cut and always read zero. Returns the full
/// cut set.
pub fn mark_cuts(registry: &mut Registry, min_amount: f64) -> BTreeSet<String> {
    let mut cut_set = BTreeSet::new();

    for (id, project) in registry.iter_mut() {
        if !project.is_eligible {
            project.is_cut = false;
            project.scaled_amount = 0.0;
            continue;
        }

        if project.is_cut || project.scaled_amount < min_amount {
            project.is_cut = true;
            project.scaled_amount = 0.0;
            cut_set.insert(id.clone());
        } else {
            project.is_cut = false;
        }
    }

    cut_set
}

/// Run a single round. A degenerate scale skips the cut step.
pub fn apply_round(registry: &mut Registry, config: &AllocationConfig) -> RoundResult {
    let outcome = scale(registry, config.total_amount);
    let cut_set = if outcome.is_degenerate() {
        registry
            .iter()
            .filter(|(_, p)| p.is_eligible && p.is_cut)
            .map(|(id, _)| id.clone())
            .collect()
    } else {
        mark_cuts(registry, config.min_amount)
    };

    RoundResult {
        scale: outcome,
        cut_set,
    }
}

/// Iterate rounds until the cut set stops growing or the cap is reached.
pub fn run<R>(
    registry: &mut Registry,
    config: &AllocationConfig,
    reviewer: &mut R,
) -> Result<LoopOutcome>
where
    R: Reviewer + ?Sized,
{
    let mut previous = BTreeSet::new();
    let mut cut_history = Vec::new();
    let mut rounds = 0;
    let mut termination = Termination::IterationCap;

    for round in 1..=config.max_iterations {
        rounds = round;
        let result = apply_round(registry, config);

        if let ScaleOutcome::Degenerate { survivors } = result.scale {
            warn!(
                round,
                survivors,
                "No eligible projects left to fund; all scaled amounts are zero"
            );
            termination = Termination::Degenerate;
            break;
        }

        let newly_cut: BTreeSet<String> =
            result.cut_set.difference(&previous).cloned().collect();

        info!(
            round,
            survivors = registry.values().filter(|p| p.is_surviving()).count(),
            cut = result.cut_set.len(),
            newly_cut = newly_cut.len(),
            "Completed cut round"
        );

        if newly_cut.is_empty() {
            termination = Termination::Converged;
            break;
        }

        let notice = CutNotice {
            round,
            cut_set: result.cut_set,
            newly_cut,
        };
        reviewer.review(&notice)?;

        previous = notice.cut_set.clone();
        cut_history.push(notice);
    }

    if termination == Termination::IterationCap {
        warn!(
            rounds,
            "Iteration cap reached before the cut set stabilized"
        );
    }

    Ok(LoopOutcome {
        rounds,
        termination,
        cut_history,
    })
}
