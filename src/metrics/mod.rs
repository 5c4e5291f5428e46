//! Benchmark metrics for a system inventory scored against a reference.
//!
//! Matcher outcomes are turned into [`ReconciliationEntry`] rows by
//! [`build_entries`], which assigns a [`MatchType`] and compares province,
//! fuel and status. [`compute_metrics`] then aggregates the rows into
//! coverage, precision, F1, attribute accuracy and an error taxonomy.
//!
//! [`ReconciliationEntry`]: crate::core::outcome::ReconciliationEntry
//! [`MatchType`]: crate::core::types::MatchType

pub mod entries;
pub mod summary;

pub use entries::{build_entries, match_type_for, reconcile_entries};
pub use summary::{compute_metrics, format_metrics, BenchmarkMetrics, ErrorTaxonomy};
