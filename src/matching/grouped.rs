use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::outcome::Outcome;
use crate::core::record::Record;
use crate::core::types::MatchStatus;
use crate::matching::engine::{reconcile, MatchError, MatcherKind, ReconcileOptions};
use crate::matching::scoring::within_tolerance;

/// Label of an exact-name pair whose capacities differ beyond the tolerance
pub const MATCHED_DIFF_LABEL: &str = "Matched (Diff)";

/// Display label of an outcome.
///
/// `Matched` pairs whose known capacity difference exceeds
/// `capacity_tolerance` are reported as [`MATCHED_DIFF_LABEL`]; every other
/// outcome uses its status label.
#[must_use]
pub fn outcome_label(outcome: &Outcome, capacity_tolerance: f64) -> &'static str {
    if is_exact_diff(outcome, capacity_tolerance) {
        MATCHED_DIFF_LABEL
    } else {
        outcome.status.label()
    }
}

fn is_exact_diff(outcome: &Outcome, capacity_tolerance: f64) -> bool {
    outcome.status == MatchStatus::Matched
        && !within_tolerance(outcome.capacity_difference, capacity_tolerance)
}

/// Per-status outcome counts
///
/// `matched` holds exact-name pairs within the capacity tolerance and
/// `matched_exact_diff` the ones beyond it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub matched: usize,
    pub matched_exact_diff: usize,
    pub matched_fuzzy: usize,
    pub matched_fuzzy_diff: usize,
    pub mismatched: usize,
    pub only_in_a: usize,
    pub only_in_b: usize,
    pub total_rows: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn from_outcomes(outcomes: &[Outcome], capacity_tolerance: f64) -> Self {
        let mut counts = Self::default();
        for outcome in outcomes {
            counts.record(outcome, capacity_tolerance);
        }
        counts
    }

    fn record(&mut self, outcome: &Outcome, capacity_tolerance: f64) {
        match outcome.status {
            MatchStatus::Matched if is_exact_diff(outcome, capacity_tolerance) => {
                self.matched_exact_diff += 1;
            }
            MatchStatus::Matched => self.matched += 1,
            MatchStatus::MatchedFuzzy => self.matched_fuzzy += 1,
            MatchStatus::MatchedFuzzyDiff => self.matched_fuzzy_diff += 1,
            MatchStatus::Mismatched => self.mismatched += 1,
            MatchStatus::OnlyInA => self.only_in_a += 1,
            MatchStatus::OnlyInB => self.only_in_b += 1,
        }
        self.total_rows += 1;
    }

    /// Add another set of counts into this one
    pub fn merge(&mut self, other: &StatusCounts) {
        self.matched += other.matched;
        self.matched_exact_diff += other.matched_exact_diff;
        self.matched_fuzzy += other.matched_fuzzy;
        self.matched_fuzzy_diff += other.matched_fuzzy_diff;
        self.mismatched += other.mismatched;
        self.only_in_a += other.only_in_a;
        self.only_in_b += other.only_in_b;
        self.total_rows += other.total_rows;
    }

    /// Rows that pair an A record with a B record
    #[must_use]
    pub fn pairs(&self) -> usize {
        self.matched
            + self.matched_exact_diff
            + self.matched_fuzzy
            + self.matched_fuzzy_diff
            + self.mismatched
    }
}

/// Outcomes of one province x fuel group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupResult {
    /// Cleaned province; empty when unknown
    pub province: String,
    /// Cleaned fuel; empty when unknown
    pub fuel: String,
    /// Outcomes with indices into the full input collections
    pub outcomes: Vec<Outcome>,
    pub counts: StatusCounts,
}

/// Reconcile two collections separately within each province x fuel group.
///
/// Records only ever pair with records of the same group. Groups are
/// returned in sorted key order and cover every record of both inputs.
///
/// # Errors
///
/// Returns the first `MatchError` raised by a group.
pub fn reconcile_grouped(
    kind: MatcherKind,
    a: &[Record],
    b: &[Record],
    options: &ReconcileOptions,
) -> Result<Vec<GroupResult>, MatchError> {
    let mut groups: BTreeMap<(String, String), (Vec<usize>, Vec<usize>)> = BTreeMap::new();
    for (i, record) in a.iter().enumerate() {
        groups.entry(record.group_key()).or_default().0.push(i);
    }
    for (j, record) in b.iter().enumerate() {
        groups.entry(record.group_key()).or_default().1.push(j);
    }
    tracing::info!(groups = groups.len(), "Reconciling by province and fuel");

    let mut results = Vec::with_capacity(groups.len());
    for ((province, fuel), (indices_a, indices_b)) in groups {
        let group_a: Vec<Record> = indices_a.iter().map(|&i| a[i].clone()).collect();
        let group_b: Vec<Record> = indices_b.iter().map(|&j| b[j].clone()).collect();

        let mut outcomes = reconcile(kind, &group_a, &group_b, options)?;
        for outcome in &mut outcomes {
            outcome.index_a = outcome.index_a.map(|i| indices_a[i]);
            outcome.index_b = outcome.index_b.map(|j| indices_b[j]);
        }

        let counts = StatusCounts::from_outcomes(&outcomes, options.capacity_tolerance);
        tracing::debug!(
            province = %province,
            fuel = %fuel,
            a = group_a.len(),
            b = group_b.len(),
            matched = counts.pairs(),
            "Group reconciled"
        );
        results.push(GroupResult {
            province,
            fuel,
            outcomes,
            counts,
        });
    }

    Ok(results)
}
