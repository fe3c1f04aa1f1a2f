//! Run settings: allocation parameters plus file locations.
//!
//! Layered in order: built-in defaults, an optional TOML file, then
//! individual overrides from flags or environment.
//!
//! ```toml
//! input = "./output/outputVerifySig.csv"
//! output = "./output/outputResultsFinal.csv"
//!
//! [allocation]
//! quorum = 17
//! min_amount = 1500
//! total_amount = 30000000
//! max_iterations = 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tally_core::AllocationConfig;

use crate::error::{Error, Result};

pub const DEFAULT_INPUT: &str = "./output/outputVerifySig.csv";
pub const DEFAULT_OUTPUT: &str = "./output/outputResultsFinal.csv";

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ballot export to read.
    pub input: PathBuf,
    /// Where results are written.
    pub output: PathBuf,
    pub allocation: AllocationConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            allocation: AllocationConfig::default(),
        }
    }
}

/// Per-field overrides applied on top of file settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub quorum: Option<usize>,
    pub min_amount: Option<f64>,
    pub total_amount: Option<f64>,
    pub max_iterations: Option<usize>,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load defaults, then the file at `path` if given, then `overrides`.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_toml(&fs::read_to_string(path)?, path)?,
            None => Self::default(),
        };
        settings.apply(overrides);
        settings.allocation.validate()?;
        Ok(settings)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(input) = overrides.input {
            self.input = input;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(quorum) = overrides.quorum {
            self.allocation.quorum = quorum;
        }
        if let Some(min_amount) = overrides.min_amount {
            self.allocation.min_amount = min_amount;
        }
        if let Some(total_amount) = overrides.total_amount {
            self.allocation.total_amount = total_amount;
        }
        if let Some(max_iterations) = overrides.max_iterations {
            self.allocation.max_iterations = max_iterations;
        }
    }
}
