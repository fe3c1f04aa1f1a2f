//! Result file writer.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tally_core::ProjectResult;
use tracing::info;

use crate::error::Result;

/// Column titles, in order.
pub const HEADER: [&str; 7] = [
    "Project ID",
    "Votes Array",
    "Votes Count",
    "Median Amount",
    "Is Eligible",
    "Is Cut",
    "Scaled Amount",
];

/// Write results to `path`, creating the parent directory if needed.
pub fn write_results(path: &Path, results: &[ProjectResult]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_results_to(file, results)?;
    info!(path = %path.display(), projects = results.len(), "Results saved");
    Ok(())
}

/// Write results as CSV to any sink.
pub fn write_results_to<W: Write>(writer: W, results: &[ProjectResult]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;

    for result in results {
        let votes = result
            .votes
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        csv.write_record([
            result.project_id.clone(),
            votes,
            result.vote_count.to_string(),
            result.median_amount.to_string(),
            result.is_eligible.to_string(),
            result.is_cut.to_string(),
            result.scaled_amount.to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, votes: Vec<f64>, eligible: bool, cut: bool, amount: f64) -> ProjectResult {
        ProjectResult {
            project_id: id.to_string(),
            vote_count: votes.len(),
            median_amount: tally_core::median(&votes),
            votes,
            is_eligible: eligible,
            is_cut: cut,
            scaled_amount: amount,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let mut buf = Vec::new();
        write_results_to(
            &mut buf,
            &[
                result("a", vec![1.0, 2.5], true, false, 1000.0),
                result("b", vec![], false, false, 0.0),
            ],
        )
        .unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Project ID,Votes Array,Votes Count,Median Amount,Is Eligible,Is Cut,Scaled Amount"
        );
        assert_eq!(lines[1], "a,\"1,2.5\",2,1.75,true,false,1000");
        assert_eq!(lines[2], "b,,0,0,false,false,0");
    }

    #[test]
    fn creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("results.csv");

        write_results(&path, &[result("a", vec![5.0], true, true, 0.0)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("a,5,1,5,true,true,0"));
    }
}
