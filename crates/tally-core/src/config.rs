//! Allocation parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum pledge count for a project to be eligible.
pub const DEFAULT_QUORUM: usize = 17;

/// Minimum scaled payout a surviving project must reach.
pub const DEFAULT_MIN_AMOUNT: f64 = 1_500.0;

/// Budget distributed across surviving projects.
pub const DEFAULT_TOTAL_AMOUNT: f64 = 30_000_000.0;

/// Hard cap on cut rounds.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Relative tolerance for the final budget check.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Parameters driving one allocation run.
///
/// Every field has a default, so a partial TOML table deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Pledges required for eligibility (`pledge_count >= quorum`).
    pub quorum: usize,
    /// Floor below which a scaled amount gets the project cut.
    pub min_amount: f64,
    /// Fixed pool shared by the surviving eligible projects.
    pub total_amount: f64,
    /// Maximum number of scale/cut rounds.
    pub max_iterations: usize,
    /// Relative tolerance used when checking the allocated sum.
    pub tolerance: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            quorum: DEFAULT_QUORUM,
            min_amount: DEFAULT_MIN_AMOUNT,
            total_amount: DEFAULT_TOTAL_AMOUNT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl AllocationConfig {
    /// Reject parameters the algorithm cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.total_amount.is_finite() || self.total_amount <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "total_amount must be a positive number, got {}",
                self.total_amount
            )));
        }
        if !self.min_amount.is_finite() || self.min_amount < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min_amount must be a non-negative number, got {}",
                self.min_amount
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Whether `allocated` equals the configured budget within tolerance.
    pub fn allocation_matches(&self, allocated: f64) -> bool {
        let slack = self.tolerance * self.total_amount.abs().max(1.0);
        (allocated - self.total_amount).abs() <= slack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AllocationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.quorum, 17);
        assert_eq!(config.max_iterations, 10);
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let cases = [
            AllocationConfig { total_amount: 0.0, ..Default::default() },
            AllocationConfig { total_amount: f64::INFINITY, ..Default::default() },
            AllocationConfig { min_amount: -1.0, ..Default::default() },
            AllocationConfig { min_amount: f64::NAN, ..Default::default() },
            AllocationConfig { max_iterations: 0, ..Default::default() },
            AllocationConfig { tolerance: -0.1, ..Default::default() },
        ];

        for config in cases {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig(_))),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn allocation_match_is_relative() {
        let config = AllocationConfig::default();
        assert!(config.allocation_matches(30_000_000.0));
        assert!(config.allocation_matches(30_000_000.000_01));
        assert!(!config.allocation_matches(29_999_000.0));
        assert!(!config.allocation_matches(0.0));
    }

    #[test]
    fn partial_table_fills_defaults() {
        let config: AllocationConfig =
            serde_json::from_str(r#"{"quorum": 3, "min_amount": 10}"#).unwrap();
        assert_eq!(config.quorum, 3);
        assert_eq!(config.min_amount, 10.0);
        assert_eq!(config.total_amount, DEFAULT_TOTAL_AMOUNT);
    }
}
