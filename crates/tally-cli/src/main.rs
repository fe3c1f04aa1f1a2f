//! tally binary
//!
//! Reads a verified ballot export, runs the allocation, writes results.

use std::path::PathBuf;

use clap::Parser;
use tally_cli::{Overrides, PromptReviewer, Settings};
use tally_core::{AllocationCheck, AutoApprove, Termination};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Quorum-gated, median-weighted fund allocation
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Allocate a fixed budget across projects from verified ballots", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML settings file
    #[arg(short, long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Ballot export (CSV with verified_signature and signed_payload columns)
    #[arg(short, long, env = "TALLY_INPUT")]
    input: Option<PathBuf>,

    /// Result file
    #[arg(short, long, env = "TALLY_OUTPUT")]
    output: Option<PathBuf>,

    /// Minimum pledges for eligibility
    #[arg(long, env = "TALLY_QUORUM")]
    quorum: Option<usize>,

    /// Payout floor below which a project is cut
    #[arg(long, env = "TALLY_MIN_AMOUNT")]
    min_amount: Option<f64>,

    /// Budget to distribute
    #[arg(long, env = "TALLY_TOTAL_AMOUNT")]
    total_amount: Option<f64>,

    /// Maximum cut rounds
    #[arg(long, env = "TALLY_MAX_ITERATIONS")]
    max_iterations: Option<usize>,

    /// Continue through cut rounds without waiting for Enter
    #[arg(short, long)]
    yes: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=info,tally_cli=info,tally_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let overrides = Overrides {
        input: cli.input,
        output: cli.output,
        quorum: cli.quorum,
        min_amount: cli.min_amount,
        total_amount: cli.total_amount,
        max_iterations: cli.max_iterations,
    };
    let settings = Settings::load(cli.config.as_deref(), overrides)?;

    tracing::info!(
        input = %settings.input.display(),
        quorum = settings.allocation.quorum,
        min_amount = settings.allocation.min_amount,
        total_amount = settings.allocation.total_amount,
        max_iterations = settings.allocation.max_iterations,
        "Starting allocation"
    );

    let report = if cli.yes {
        tally_cli::run(&settings, &mut AutoApprove)?
    } else {
        tally_cli::run(&settings, &mut PromptReviewer::stdin())?
    };

    println!();
    match report.check {
        AllocationCheck::Balanced { allocated } => {
            println!("Total allocated amount ({}) equals the budget", allocated)
        }
        AllocationCheck::Imbalanced { allocated, expected } => println!(
            "Error: Total allocated amount ({}) does not equal the budget ({})",
            allocated, expected
        ),
        AllocationCheck::NothingFunded => println!("No project received funding"),
    }
    if report.outcome.termination == Termination::IterationCap {
        println!(
            "Warning: stopped after {} rounds without a stable cut set",
            report.outcome.rounds
        );
    }
    println!(
        "Funded {} of {} projects in {} round(s)",
        report.funded().count(),
        report.projects.len(),
        report.outcome.rounds
    );
    println!("Results saved in {}", settings.output.display());

    Ok(())
}
