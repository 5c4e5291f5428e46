//! Record matching and classification.
//!
//! This module reconciles two collections of cleaned [`Record`]s:
//!
//! - [`ReconcileOptions`]: thresholds and costs shared by every matcher
//! - [`Matcher`]: the strategy trait, selected with [`MatcherKind`]
//! - [`OptimalMatcher`]: globally optimal one-to-one assignment
//! - [`PhasedMatcher`]: exact pass followed by a greedy fuzzy pass
//! - [`reconcile_grouped`]: the same, run per province x fuel group
//!
//! ## Cost model
//!
//! A pair costs `base + capacity_weight * |capacity_a - capacity_b|`, where
//! `base` is `0` for identical cleaned names, `1` for names whose
//! [`partial_ratio`](scoring::partial_ratio) reaches the threshold and
//! `mismatch_penalty` otherwise. Leaving a record unmatched costs
//! `dummy_cost`.
//!
//! ## Example
//!
//! ```rust
//! use plant_recon::core::record::Record;
//! use plant_recon::core::types::MatchStatus;
//! use plant_recon::matching::{reconcile, MatcherKind, ReconcileOptions};
//!
//! let a = vec![Record::new("Plant A", "plant a", Some(100.0))];
//! let b = vec![
//!     Record::new("Plant A Inc.", "plant a incorporated", Some(100.0)),
//!     Record::new("Plant Z", "plant z", Some(50.0)),
//! ];
//!
//! let outcomes = reconcile(MatcherKind::Optimal, &a, &b, &ReconcileOptions::default()).unwrap();
//! assert_eq!(outcomes[0].status, MatchStatus::MatchedFuzzy);
//! assert_eq!(outcomes[1].status, MatchStatus::OnlyInB);
//! ```
//!
//! [`Record`]: crate::core::record::Record

pub mod engine;
pub mod grouped;
pub mod optimal;
pub mod phased;
pub mod scoring;

pub use engine::{is_partition, reconcile, MatchError, Matcher, MatcherKind, ReconcileOptions};
pub use grouped::{
    outcome_label, reconcile_grouped, GroupResult, StatusCounts, MATCHED_DIFF_LABEL,
};
pub use optimal::{OptimalMatcher, SolverError};
pub use phased::PhasedMatcher;
