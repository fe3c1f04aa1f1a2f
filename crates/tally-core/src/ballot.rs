//! Ballot aggregation.
//!
//! Verified ballots carry a JSON array of `{projectId, amount}` pledges.
//! Every numeric pledge is appended to its project's pledge list; a pledge
//! whose amount is not a number is dropped on its own without touching the
//! rest of the ballot. A payload that is not a pledge array at all aborts
//! the run.

use serde::Deserialize;
use serde_json::value::RawValue;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::project::Registry;

/// One submitted ballot, after upstream signature checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    /// Outcome of signature verification. Unverified ballots are ignored.
    pub verified: bool,
    /// Serialized pledge array.
    pub signed_payload: String,
}

impl Ballot {
    pub fn new(verified: bool, signed_payload: impl Into<String>) -> Self {
        Self {
            verified,
            signed_payload: signed_payload.into(),
        }
    }
}

/// A parsed pledge. `amount` is `None` when it was not numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct Pledge {
    pub project_id: String,
    pub amount: Option<f64>,
}

/// Project keys arrive as strings, or occasionally as bare JSON numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProjectKey {
    Text(String),
    Number(serde_json::Number),
}

impl From<ProjectKey> for String {
    fn from(key: ProjectKey) -> Self {
        match key {
            ProjectKey::Text(text) => text,
            ProjectKey::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPledge {
    #[serde(rename = "projectId")]
    project_id: ProjectKey,
    // Kept raw so an out-of-range number skips the pledge instead of
    // failing the whole payload.
    #[serde(default)]
    amount: Option<Box<RawValue>>,
}

/// Parse a pledge payload.
///
/// Amounts are accepted as JSON numbers or numeric strings. Anything else
/// yields a pledge with no amount rather than an error.
pub fn parse_pledges(payload: &str) -> std::result::Result<Vec<Pledge>, serde_json::Error> {
    let raw: Vec<RawPledge> = serde_json::from_str(payload)?;
    Ok(raw
        .into_iter()
        .map(|p| Pledge {
            amount: p.amount.as_deref().and_then(numeric_amount),
            project_id: p.project_id.into(),
        })
        .collect())
}

fn numeric_amount(raw: &RawValue) -> Option<f64> {
    let text = raw.get();
    let amount = if text.starts_with('"') {
        serde_json::from_str::<String>(text).ok()?.trim().parse::<f64>().ok()?
    } else if text.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
        text.parse::<f64>().ok()?
    } else {
        return None;
    };
    amount.is_finite().then_some(amount)
}

/// Counters from one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    pub ballots: usize,
    pub verified: usize,
    pub accepted: usize,
    pub skipped: usize,
}

/// Group every numeric pledge on a verified ballot by project.
///
/// The result does not depend on ballot or pledge order beyond the order of
/// each project's pledge list.
pub fn aggregate<'a, I>(ballots: I) -> Result<(Registry, AggregationStats)>
where
    I: IntoIterator<Item = &'a Ballot>,
{
    let mut registry = Registry::new();
    let mut stats = AggregationStats::default();

    for (index, ballot) in ballots.into_iter().enumerate() {
        stats.ballots += 1;
        if !ballot.verified {
            continue;
        }
        stats.verified += 1;

        let pledges = parse_pledges(&ballot.signed_payload)
            .map_err(|source| Error::MalformedPledgePayload { ballot: index, source })?;

        for pledge in pledges {
            match pledge.amount {
                Some(amount) => {
                    registry
                        .entry(pledge.project_id)
                        .or_default()
                        .pledge_amounts
                        .push(amount);
                    stats.accepted += 1;
                }
                None => {
                    stats.skipped += 1;
                    debug!(ballot = index, "Skipping non-numeric pledge amount");
                }
            }
        }
    }

    info!(
        ballots = stats.ballots,
        verified = stats.verified,
        accepted = stats.accepted,
        skipped = stats.skipped,
        projects = registry.len(),
        "Aggregated ballots"
    );

    Ok((registry, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ballot(payload: &str) -> Ballot {
        Ballot::new(true, payload)
    }

    #[test]
    fn groups_pledges_by_project() {
        let ballots = vec![
            ballot(r#"[{"projectId":"a","amount":"100"},{"projectId":"b","amount":5}]"#),
            ballot(r#"[{"projectId":"a","amount":200.5}]"#),
        ];

        let (registry, stats) = aggregate(&ballots).unwrap();
        assert_eq!(registry["a"].pledge_amounts, vec![100.0, 200.5]);
        assert_eq!(registry["a"].pledge_count(), 2);
        assert_eq!(registry["b"].pledge_amounts, vec![5.0]);
        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.verified, 2);
    }

    #[test]
    fn unverified_ballots_are_ignored_unparsed() {
        let ballots = vec![
            Ballot::new(false, r#"[{"projectId":"a","amount":"100"}]"#),
            Ballot::new(false, "not json at all"),
        ];

        let (registry, stats) = aggregate(&ballots).unwrap();
        assert!(registry.is_empty());
        assert_eq!(stats.ballots, 2);
        assert_eq!(stats.verified, 0);
    }

    #[test]
    fn non_numeric_amount_skips_only_that_pledge() {
        let ballots = vec![ballot(
            r#"[{"projectId":"a","amount":"lots"},
                {"projectId":"a","amount":"  42 "},
                {"projectId":"b","amount":null},
                {"projectId":"c"},
                {"projectId":"d","amount":true}]"#,
        )];

        let (registry, stats) = aggregate(&ballots).unwrap();
        assert_eq!(registry["a"].pledge_amounts, vec![42.0]);
        assert_eq!(registry.len(), 1);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.skipped, 4);
    }

    #[test]
    fn project_seen_only_with_bad_amounts_gets_no_entry() {
        let ballots = vec![ballot(
            r#"[{"projectId":"ghost","amount":"abc"},{"projectId":"real","amount":"5"}]"#,
        )];

        let (registry, _) = aggregate(&ballots).unwrap();
        let keys: Vec<&str> = registry.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["real"]);
    }

    #[test]
    fn numeric_project_id_becomes_text_key() {
        let ballots = vec![ballot(r#"[{"projectId":42,"amount":7},{"projectId":"42","amount":3}]"#)];

        let (registry, _) = aggregate(&ballots).unwrap();
        assert_eq!(registry["42"].pledge_amounts, vec![7.0, 3.0]);
    }

    #[test]
    fn out_of_range_amount_skips_only_that_pledge() {
        let pledges = parse_pledges(
            r#"[{"projectId":"a","amount":1e400},{"projectId":"a","amount":-2.5e2}]"#,
        )
        .unwrap();

        assert_eq!(pledges[0].amount, None);
        assert_eq!(pledges[1].amount, Some(-250.0));
    }

    #[test]
    fn non_finite_strings_are_not_numeric() {
        let pledges =
            parse_pledges(r#"[{"projectId":"a","amount":"inf"},{"projectId":"a","amount":"NaN"}]"#)
                .unwrap();
        assert!(pledges.iter().all(|p| p.amount.is_none()));
    }

    #[test]
    fn malformed_payload_aborts() {
        let ballots = vec![
            ballot(r#"[{"projectId":"a","amount":1}]"#),
            ballot(r#"{"projectId":"a"}"#),
        ];

        match aggregate(&ballots) {
            Err(Error::MalformedPledgePayload { ballot, .. }) => assert_eq!(ballot, 1),
            other => panic!("expected malformed payload error, got {:?}", other),
        }
    }

    #[test]
    fn pledge_without_project_id_is_malformed() {
        assert!(parse_pledges(r#"[{"amount":1}]"#).is_err());
    }

    proptest! {
        #[test]
        fn aggregation_is_order_independent(
            pledges in prop::collection::vec((0u8..4, 0u32..10_000), 0..40)
        ) {
            let ballots: Vec<Ballot> = pledges
                .iter()
                .map(|(p, a)| ballot(&format!(r#"[{{"projectId":"p{}","amount":{}}}]"#, p, a)))
                .collect();
            let reversed: Vec<Ballot> = ballots.iter().rev().cloned().collect();

            let (forward, _) = aggregate(&ballots).unwrap();
            let (backward, _) = aggregate(&reversed).unwrap();

            prop_assert_eq!(forward.len(), backward.len());
            for (id, project) in &forward {
                let mut a = project.pledge_amounts.clone();
                let mut b = backward[id].pledge_amounts.clone();
                a.sort_by(f64::total_cmp);
                b.sort_by(f64::total_cmp);
                prop_assert_eq!(a, b);
            }
        }
    }
}
