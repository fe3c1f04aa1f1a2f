//! Ballot export reader.
//!
//! The export is a CSV file with a header row. Only two columns matter:
//! `verified_signature` (`TRUE` when the upstream check passed) and
//! `signed_payload` (the JSON pledge array). Other columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tally_core::Ballot;
use tracing::info;

use crate::error::{Error, Result};

pub const VERIFIED_COLUMN: &str = "verified_signature";
pub const PAYLOAD_COLUMN: &str = "signed_payload";

/// Exact cell value marking a verified row.
pub const VERIFIED_TRUE: &str = "TRUE";

/// Read every ballot row from a CSV export on disk.
pub fn read_ballots(path: &Path) -> Result<Vec<Ballot>> {
    let file = File::open(path)?;
    let ballots = read_ballots_from(file, &path.display().to_string())?;
    info!(path = %path.display(), rows = ballots.len(), "Loaded ballots");
    Ok(ballots)
}

/// Read ballot rows from any CSV source. `source` names it in errors.
pub fn read_ballots_from<R: Read>(reader: R, source: &str) -> Result<Vec<Ballot>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::MissingColumn {
                column: name,
                path: source.to_string(),
            })
    };
    let verified_at = column(VERIFIED_COLUMN)?;
    let payload_at = column(PAYLOAD_COLUMN)?;

    let mut ballots = Vec::new();
    for record in csv.records() {
        let record = record?;
        let verified = record
            .get(verified_at)
            .is_some_and(|v| v == VERIFIED_TRUE);
        let payload = record.get(payload_at).unwrap_or_default();
        ballots.push(Ballot::new(verified, payload));
    }

    Ok(ballots)
}
