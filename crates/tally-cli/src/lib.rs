//! File and terminal plumbing around `tally-core`.
//!
//! - **input**: ballot export (CSV) reader
//! - **output**: result CSV writer
//! - **review**: interactive acknowledgment between cut rounds
//! - **settings**: defaults, TOML file, and per-field overrides

pub mod error;
pub mod input;
pub mod output;
pub mod review;
pub mod settings;

pub use error::{Error, Result};
pub use input::{read_ballots, read_ballots_from};
pub use output::{write_results, write_results_to};
pub use review::PromptReviewer;
pub use settings::{Overrides, Settings};

use tally_core::{allocate, AllocationReport, Reviewer};

/// Read ballots, allocate, and write results as configured.
pub fn run<R>(settings: &Settings, reviewer: &mut R) -> Result<AllocationReport>
where
    R: Reviewer + ?Sized,
{
    let ballots = read_ballots(&settings.input)?;
    let report = allocate(&ballots, &settings.allocation, reviewer)?;
    write_results(&settings.output, &report.projects)?;
    Ok(report)
}
