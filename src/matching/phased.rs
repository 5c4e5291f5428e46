//! Greedy three-phase reconciliation.
//!
//! 1. **Exact**: each A record takes the first unused B record with the
//!    same cleaned name and the same known capacity.
//! 2. **Fuzzy**: each remaining A record, in input order, takes the unused
//!    B record with the highest name similarity, if it reaches the
//!    threshold. Otherwise the A record is left unmatched.
//! 3. **Leftovers**: unused B records are reported as only in B.
//!
//! Earlier A records get first pick, so the result depends on input order.

use crate::core::outcome::Outcome;
use crate::core::record::Record;
use crate::core::types::MatchStatus;
use crate::matching::engine::{MatchError, Matcher, ReconcileOptions};
use crate::matching::scoring::{fuzzy_status, name_similarity};

/// Matcher that pairs exact matches first and then greedily pairs the rest
#[derive(Debug, Clone, Copy, Default)]
pub struct PhasedMatcher;

/// Same cleaned name and the same known capacity
fn is_exact(a: &Record, b: &Record) -> bool {
    #[allow(clippy::float_cmp)]
    let same_capacity = matches!(
        (a.capacity_clean, b.capacity_clean),
        (Some(x), Some(y)) if x == y
    );
    a.name_clean == b.name_clean && same_capacity
}

impl Matcher for PhasedMatcher {
    fn name(&self) -> &'static str {
        "phased"
    }

    fn reconcile(
        &self,
        a: &[Record],
        b: &[Record],
        options: &ReconcileOptions,
    ) -> Result<Vec<Outcome>, MatchError> {
        options.validate()?;

        let mut outcomes = Vec::with_capacity(a.len() + b.len());
        let mut remaining_a: Vec<usize> = (0..a.len()).collect();
        let mut remaining_b: Vec<usize> = (0..b.len()).collect();

        // Phase 1: exact
        remaining_a.retain(|&i| {
            let Some(pos) = remaining_b.iter().position(|&j| is_exact(&a[i], &b[j])) else {
                return true;
            };
            let j = remaining_b.remove(pos);
            outcomes.push(Outcome::pair(i, &a[i], j, &b[j], MatchStatus::Matched));
            false
        });
        let exact = outcomes.len();

        // Phase 2: fuzzy, best candidate per A record; the first of equal scores wins
        for i in remaining_a {
            let best = remaining_b
                .iter()
                .enumerate()
                .map(|(pos, &j)| (pos, name_similarity(&a[i], &b[j])))
                .fold(None, |best: Option<(usize, f64)>, (pos, score)| match best {
                    Some((_, top)) if score <= top => best,
                    _ => Some((pos, score)),
                });

            match best {
                Some((pos, score)) if score >= options.threshold() => {
                    let j = remaining_b.remove(pos);
                    let status = fuzzy_status(
                        a[i].capacity_difference(&b[j]),
                        options.capacity_tolerance,
                    );
                    tracing::trace!(a = i, b = j, score, %status, "Fuzzy pair");
                    outcomes.push(Outcome::pair(i, &a[i], j, &b[j], status));
                }
                _ => outcomes.push(Outcome::only_in_a(i, &a[i])),
            }
        }

        // Phase 3: leftovers
        outcomes.extend(remaining_b.iter().map(|&j| Outcome::only_in_b(j, &b[j])));

        tracing::debug!(
            exact,
            fuzzy = outcomes.iter().filter(|o| o.status.is_pair()).count() - exact,
            only_in_a = outcomes.iter().filter(|o| o.status == MatchStatus::OnlyInA).count(),
            only_in_b = remaining_b.len(),
            "Phased matching complete"
        );
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::engine::is_partition;

    fn record(name_clean: &str, capacity: Option<f64>) -> Record {
        Record::new(name_clean, name_clean, capacity)
    }

    fn reconcile(a: &[Record], b: &[Record]) -> Vec<Outcome> {
        PhasedMatcher
            .reconcile(a, b, &ReconcileOptions::default())
            .unwrap()
    }

    #[test]
    fn test_exact_phase_requires_equal_capacity() {
        let a = vec![record("plant a", Some(100.0))];
        let b = vec![record("plant a", Some(100.0))];
        let outcomes = reconcile(&a, &b);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, MatchStatus::Matched);

        // Same name, different capacity: falls through to the fuzzy phase
        let b = vec![record("plant a", Some(150.0))];
        let outcomes = reconcile(&a, &b);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, MatchStatus::MatchedFuzzyDiff);
        assert_eq!(outcomes[0].capacity_difference, Some(-50.0));
    }

    #[test]
    fn test_unknown_capacity_is_never_exact() {
        let a = vec![record("plant a", None)];
        let b = vec![record("plant a", None)];
        let outcomes = reconcile(&a, &b);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, MatchStatus::MatchedFuzzy);
        assert_eq!(outcomes[0].capacity_difference, None);
    }

    #[test]
    fn test_exact_phase_runs_before_fuzzy() {
        // A0 would take B0 by similarity, but B0 is claimed exactly by A1 first
        let a = vec![record("vinh tan", Some(600.0)), record("vinh tan 4", Some(1200.0))];
        let b = vec![record("vinh tan 4", Some(1200.0)), record("vinh tan 2", Some(600.0))];
        let outcomes = reconcile(&a, &b);

        assert!(is_partition(&outcomes, 2, 2));
        assert_eq!(outcomes[0].index_a, Some(1));
        assert_eq!(outcomes[0].index_b, Some(0));
        assert_eq!(outcomes[0].status, MatchStatus::Matched);

        assert_eq!(outcomes[1].index_a, Some(0));
        assert_eq!(outcomes[1].index_b, Some(1));
        assert_eq!(outcomes[1].status, MatchStatus::MatchedFuzzy);
    }

    #[test]
    fn test_below_threshold_is_only_in_a() {
        let a = vec![record("alpha", Some(100.0))];
        let b = vec![record("zulu", Some(100.0))];
        let outcomes = reconcile(&a, &b);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].status, MatchStatus::OnlyInA);
        assert_eq!(outcomes[0].index_a, Some(0));
        assert_eq!(outcomes[1].status, MatchStatus::OnlyInB);
        assert_eq!(outcomes[1].index_b, Some(0));
    }

    #[test]
    fn test_first_of_equal_scores_wins() {
        let a = vec![record("plant a", Some(100.0))];
        let b = vec![
            record("plant a extension", Some(300.0)),
            record("plant a incorporated", Some(100.0)),
        ];
        let outcomes = reconcile(&a, &b);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].index_b, Some(0));
        assert_eq!(outcomes[0].status, MatchStatus::MatchedFuzzyDiff);
        assert_eq!(outcomes[1].status, MatchStatus::OnlyInB);
        assert_eq!(outcomes[1].index_b, Some(1));
    }

    #[test]
    fn test_input_order_decides_greedy_pairs() {
        let a = vec![record("vinh tan", Some(600.0)), record("vinh tan 4", Some(600.0))];
        let b = vec![record("vinh tan 4", Some(1200.0)), record("song hau", Some(600.0))];
        let outcomes = reconcile(&a, &b);

        // A0 takes B0 first, leaving nothing similar for A1
        assert!(is_partition(&outcomes, 2, 2));
        assert_eq!(outcomes[0].index_a, Some(0));
        assert_eq!(outcomes[0].index_b, Some(0));
        assert_eq!(outcomes[1].index_a, Some(1));
        assert_eq!(outcomes[1].status, MatchStatus::OnlyInA);
        assert_eq!(outcomes[2].index_b, Some(1));
        assert_eq!(outcomes[2].status, MatchStatus::OnlyInB);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(reconcile(&[], &[]).is_empty());

        let records = vec![record("plant a", None)];
        let outcomes = reconcile(&records, &[]);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, MatchStatus::OnlyInA);

        let outcomes = reconcile(&[], &records);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, MatchStatus::OnlyInB);
    }

    #[test]
    fn test_inputs_are_not_modified() {
        let a = vec![record("plant a", Some(100.0))];
        let b = vec![record("plant a", Some(100.0)), record("plant b", None)];
        let (a_before, b_before) = (a.clone(), b.clone());
        let _ = reconcile(&a, &b);
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let options = ReconcileOptions {
            capacity_tolerance: f64::NAN,
            ..ReconcileOptions::default()
        };
        let result = PhasedMatcher.reconcile(&[], &[], &options);
        assert!(matches!(result, Err(MatchError::InvalidOptions(_))));
    }
}
