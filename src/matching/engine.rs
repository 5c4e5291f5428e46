use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::outcome::Outcome;
use crate::core::record::Record;
use crate::matching::optimal::{OptimalMatcher, SolverError};
use crate::matching::phased::PhasedMatcher;

/// Default minimum name similarity (0-100) for a fuzzy match
pub const DEFAULT_SIMILARITY_THRESHOLD: u8 = 90;

/// Default absolute capacity tolerance in MW
pub const DEFAULT_CAPACITY_TOLERANCE: f64 = 0.0;

/// Default base cost of a pair whose names do not match
pub const DEFAULT_MISMATCH_PENALTY: f64 = 1000.0;

/// Default weight of the capacity difference in a pair cost
pub const DEFAULT_CAPACITY_WEIGHT: f64 = 0.001;

/// Default cost of leaving a record unmatched
pub const DEFAULT_DUMMY_COST: f64 = 10_000.0;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("Invalid reconciliation options: {0}")]
    InvalidOptions(String),

    #[error("Failed to read options: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse options: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable parameters shared by both matchers
///
/// Every field is optional when deserialized; missing fields take their
/// defaults:
///
/// ```json
/// { "similarity_threshold": 85, "capacity_tolerance": 25.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Minimum name similarity (0-100) for a fuzzy match
    pub similarity_threshold: u8,
    /// Absolute capacity difference (MW) that still counts as agreeing
    pub capacity_tolerance: f64,
    /// Base cost of pairing records whose names do not match
    pub mismatch_penalty: f64,
    /// Per-MW weight of the capacity difference in a pair cost
    pub capacity_weight: f64,
    /// Cost of leaving a record unmatched
    pub dummy_cost: f64,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            capacity_tolerance: DEFAULT_CAPACITY_TOLERANCE,
            mismatch_penalty: DEFAULT_MISMATCH_PENALTY,
            capacity_weight: DEFAULT_CAPACITY_WEIGHT,
            dummy_cost: DEFAULT_DUMMY_COST,
        }
    }
}

impl ReconcileOptions {
    /// Load options from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `MatchError::Read`/`MatchError::Parse` if the file cannot be
    /// read or parsed, and `MatchError::InvalidOptions` if a value is out of
    /// range.
    pub fn load_from_file(path: &Path) -> Result<Self, MatchError> {
        let content = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&content)?;
        options.validate()?;
        tracing::info!(path = %path.display(), ?options, "Reconciliation options loaded");
        Ok(options)
    }

    /// Similarity threshold as a score in `[0, 100]`
    #[must_use]
    pub fn threshold(&self) -> f64 {
        f64::from(self.similarity_threshold)
    }

    /// Check that every value is usable by the matchers.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::InvalidOptions` for a threshold above 100 or a
    /// negative or non-finite tolerance, penalty, weight or dummy cost.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.similarity_threshold > 100 {
            return Err(MatchError::InvalidOptions(format!(
                "similarity_threshold must be at most 100, got {}",
                self.similarity_threshold
            )));
        }

        let values = [
            ("capacity_tolerance", self.capacity_tolerance),
            ("mismatch_penalty", self.mismatch_penalty),
            ("capacity_weight", self.capacity_weight),
            ("dummy_cost", self.dummy_cost),
        ];
        for (field, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::InvalidOptions(format!(
                    "{field} must be a finite, non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// A strategy that reconciles two record collections
///
/// Implementations must return a partition: every index of `a` and of `b`
/// appears in exactly one outcome.
pub trait Matcher {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Pair up `a` and `b` and classify every record.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::InvalidOptions` for unusable options, or a
    /// solver error from the optimal matcher.
    fn reconcile(
        &self,
        a: &[Record],
        b: &[Record],
        options: &ReconcileOptions,
    ) -> Result<Vec<Outcome>, MatchError>;
}

/// Selects a matcher from the command line or a config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    /// Globally optimal one-to-one assignment
    #[default]
    Optimal,
    /// Exact pass, then greedy fuzzy pass
    Phased,
}

impl MatcherKind {
    #[must_use]
    pub fn matcher(self) -> Box<dyn Matcher> {
        match self {
            MatcherKind::Optimal => Box::new(OptimalMatcher),
            MatcherKind::Phased => Box::new(PhasedMatcher),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatcherKind::Optimal => "optimal",
            MatcherKind::Phased => "phased",
        }
    }
}

impl std::fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reconcile two collections with the selected matcher.
///
/// # Errors
///
/// Propagates the matcher's `MatchError`.
pub fn reconcile(
    kind: MatcherKind,
    a: &[Record],
    b: &[Record],
    options: &ReconcileOptions,
) -> Result<Vec<Outcome>, MatchError> {
    let matcher = kind.matcher();
    tracing::debug!(
        matcher = matcher.name(),
        a = a.len(),
        b = b.len(),
        "Reconciling"
    );
    let outcomes = matcher.reconcile(a, b, options)?;

    if !is_partition(&outcomes, a.len(), b.len()) {
        tracing::warn!(
            matcher = matcher.name(),
            "Outcomes do not cover every record exactly once"
        );
    }
    Ok(outcomes)
}

/// Whether `outcomes` uses every index in `0..len_a` and `0..len_b` exactly once
#[must_use]
pub fn is_partition(outcomes: &[Outcome], len_a: usize, len_b: usize) -> bool {
    let mut seen_a = vec![false; len_a];
    let mut seen_b = vec![false; len_b];

    for outcome in outcomes {
        for (index, seen) in [
            (outcome.index_a, &mut seen_a),
            (outcome.index_b, &mut seen_b),
        ] {
            if let Some(i) = index {
                match seen.get_mut(i) {
                    Some(slot) if !*slot => *slot = true,
                    _ => return false,
                }
            }
        }
        if outcome.index_a.is_none() && outcome.index_b.is_none() {
            return false;
        }
    }

    seen_a.into_iter().all(|s| s) && seen_b.into_iter().all(|s| s)
}
