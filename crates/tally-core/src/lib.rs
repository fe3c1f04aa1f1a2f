//! Quorum-gated, median-weighted fund allocation.
//!
//! Voters submit signed ballots pledging amounts to projects. A fixed budget
//! is split across the projects that clear quorum, in proportion to each
//! project's median pledge.
//!
//! # Pipeline
//!
//! 1. **Aggregate**: collect every numeric pledge from verified ballots
//! 2. **Evaluate**: median pledge per project, eligible if `count >= quorum`
//! 3. **Scale**: surviving medians scaled so they sum to the budget
//! 4. **Cut**: projects under the payout floor are dropped, then rescale
//!
//! Steps 3 and 4 repeat until a round cuts nothing new, bounded by
//! `max_iterations`. A [`Reviewer`] acknowledges every round that cuts.
//!
//! # Example
//!
//! ```
//! use tally_core::{allocate, AllocationConfig, AutoApprove, Ballot};
//!
//! let ballots: Vec<Ballot> = (0..3)
//!     .map(|_| Ballot::new(true, r#"[{"projectId":"a","amount":"100"},{"projectId":"b","amount":300}]"#))
//!     .collect();
//! let config = AllocationConfig {
//!     quorum: 3,
//!     min_amount: 500.0,
//!     total_amount: 4_000.0,
//!     ..Default::default()
//! };
//!
//! let report = allocate(&ballots, &config, &mut AutoApprove).unwrap();
//! assert_eq!(report.projects[0].scaled_amount, 1_000.0);
//! assert_eq!(report.projects[1].scaled_amount, 3_000.0);
//! ```

mod allocation;
mod ballot;
mod config;
mod cutoff;
mod error;
mod median;
mod project;
mod scale;

pub use allocation::{allocate, project_results, AllocationCheck, AllocationReport, ProjectResult};
pub use ballot::{aggregate, parse_pledges, AggregationStats, Ballot, Pledge};
pub use config::{
    AllocationConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_MIN_AMOUNT, DEFAULT_QUORUM,
    DEFAULT_TOLERANCE, DEFAULT_TOTAL_AMOUNT,
};
pub use cutoff::{
    apply_round, mark_cuts, run, AutoApprove, CutNotice, LoopOutcome, Reviewer, RoundResult,
    Termination,
};
pub use error::{Error, Result};
pub use median::{evaluate, median, meets_quorum};
pub use project::{ProjectAllocation, Registry};
pub use scale::{scale, ScaleOutcome};
