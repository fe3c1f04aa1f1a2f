//! Proportional scaling of median pledges onto the fixed budget.
//!
//! Each surviving project (eligible and not cut) receives
//! `median * total_amount / sum(surviving medians)`, so the surviving
//! amounts always add up to the budget.

use tracing::debug;

use crate::project::Registry;

/// Result of one scaling pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleOutcome {
    /// Survivors were rescaled.
    Scaled {
        survivors: usize,
        total_median: f64,
        factor: f64,
    },
    /// No usable scale factor: either no survivors, or their medians sum
    /// to zero. Every survivor was set to 0.
    Degenerate { survivors: usize },
}

impl ScaleOutcome {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, ScaleOutcome::Degenerate { .. })
    }
}

/// Rescale every surviving project's median to its share of `total_amount`.
///
/// Projects that are cut or ineligible are left untouched.
pub fn scale(registry: &mut Registry, total_amount: f64) -> ScaleOutcome {
    let survivors = registry.values().filter(|p| p.is_surviving()).count();
    let total_median: f64 = registry
        .values()
        .filter(|p| p.is_surviving())
        .map(|p| p.median_amount)
        .sum();
    let factor = total_amount / total_median;

    if survivors == 0 || total_median == 0.0 || !factor.is_finite() {
        for project in registry.values_mut().filter(|p| p.is_surviving()) {
            project.scaled_amount = 0.0;
        }
        return ScaleOutcome::Degenerate { survivors };
    }

    for project in registry.values_mut().filter(|p| p.is_surviving()) {
        project.scaled_amount = project.median_amount * factor;
    }

    debug!(survivors, total_median, factor, "Scaled surviving projects");

    ScaleOutcome::Scaled {
        survivors,
        total_median,
        factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectAllocation;
    use proptest::prelude::*;

    fn eligible(median: f64) -> ProjectAllocation {
        ProjectAllocation {
            median_amount: median,
            is_eligible: true,
            ..Default::default()
        }
    }

    #[test]
    fn preserves_ratio_and_hits_budget() {
        let mut registry = Registry::new();
        registry.insert("a".into(), eligible(100.0));
        registry.insert("b".into(), eligible(300.0));

        let outcome = scale(&mut registry, 4_000.0);

        assert_eq!(registry["a"].scaled_amount, 1_000.0);
        assert_eq!(registry["b"].scaled_amount, 3_000.0);
        assert_eq!(
            outcome,
            ScaleOutcome::Scaled { survivors: 2, total_median: 400.0, factor: 10.0 }
        );
    }

    #[test]
    fn skips_cut_and_ineligible_projects() {
        let mut registry = Registry::new();
        registry.insert("a".into(), eligible(100.0));
        registry.insert(
            "cut".into(),
            ProjectAllocation { is_cut: true, ..eligible(900.0) },
        );
        registry.insert(
            "ineligible".into(),
            ProjectAllocation { median_amount: 900.0, ..Default::default() },
        );

        scale(&mut registry, 1_000.0);

        assert_eq!(registry["a"].scaled_amount, 1_000.0);
        assert_eq!(registry["cut"].scaled_amount, 0.0);
        assert_eq!(registry["ineligible"].scaled_amount, 0.0);
    }

    #[test]
    fn no_survivors_is_degenerate() {
        let mut registry = Registry::new();
        registry.insert(
            "ineligible".into(),
            ProjectAllocation { median_amount: 10.0, ..Default::default() },
        );

        assert_eq!(
            scale(&mut registry, 1_000.0),
            ScaleOutcome::Degenerate { survivors: 0 }
        );
    }

    #[test]
    fn zero_median_sum_is_degenerate() {
        let mut registry = Registry::new();
        registry.insert("a".into(), eligible(0.0));
        registry.insert("b".into(), eligible(0.0));

        let outcome = scale(&mut registry, 1_000.0);

        assert!(outcome.is_degenerate());
        assert!(registry.values().all(|p| p.scaled_amount == 0.0));
    }

    proptest! {
        #[test]
        fn survivors_sum_to_budget(
            medians in prop::collection::vec(1.0f64..1e6, 1..30),
            total in 1.0f64..1e8,
        ) {
            let mut registry = Registry::new();
            for (i, m) in medians.iter().enumerate() {
                registry.insert(format!("p{}", i), eligible(*m));
            }

            scale(&mut registry, total);

            let sum: f64 = registry.values().map(|p| p.scaled_amount).sum();
            prop_assert!((sum - total).abs() <= total * 1e-9);
        }
    }
}
