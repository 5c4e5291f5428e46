//! # plant-recon
//!
//! A library for reconciling power plant inventories.
//!
//! Different sources describe the same plant differently: "Vĩnh Tân 4",
//! "VINH TAN IV Thermal Power Plant" and "Vinh Tan 4 (1200 MW)" are one
//! facility. `plant-recon` normalizes names and capacities, pairs the rows of
//! two inventories that refer to the same plant, and scores a system
//! inventory against a reference.
//!
//! ## Features
//!
//! - **Normalization**: Lowercasing, diacritic removal and configurable
//!   drop/substitution rules per column
//! - **Optimal matching**: Minimum-cost one-to-one assignment with an explicit
//!   cost for leaving a record unmatched
//! - **Phased matching**: Exact pass, then a greedy fuzzy pass
//! - **Grouped reconciliation**: Matching restricted to province x fuel groups
//! - **Benchmark metrics**: Coverage, precision, F1, attribute accuracy and an
//!   error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use plant_recon::normalize::PlantCleaner;
//! use plant_recon::parsing::table::parse_table_text;
//! use plant_recon::matching::{MatcherKind, ReconcileOptions};
//! use plant_recon::metrics::{compute_metrics, reconcile_entries};
//!
//! let cleaner = PlantCleaner::with_defaults().unwrap();
//! let reference = cleaner
//!     .clean_table(parse_table_text(
//!         "name,province,fuel,capacity,status\n\
//!          Vinh Tan 4,Binh Thuan,Coal,1200,Operating\n\
//!          Song Hau 1,Hau Giang,Coal,1200,Operating\n",
//!     ).unwrap())
//!     .unwrap();
//! let system = cleaner
//!     .clean_table(parse_table_text(
//!         "name,province,fuel,capacity,status\n\
//!          VINH TAN IV Thermal Power Plant,Binh Thuan,coal,1200 MW,operational\n",
//!     ).unwrap())
//!     .unwrap();
//!
//! let entries = reconcile_entries(
//!     MatcherKind::Optimal,
//!     &reference,
//!     &system,
//!     &ReconcileOptions::default(),
//! ).unwrap();
//! let metrics = compute_metrics(&entries);
//! assert_eq!(metrics.n_matched, 1);
//! assert_eq!(metrics.n_missed, 1);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Records, outcomes and match classifications
//! - [`normalize`]: Text cleaning rules and capacity parsing
//! - [`matching`]: Cost model, optimal and phased matchers
//! - [`metrics`]: Reconciliation entries and benchmark metrics
//! - [`parsing`]: CSV table reader
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod metrics;
pub mod normalize;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::outcome::{Outcome, ReconciliationEntry};
pub use core::record::Record;
pub use core::types::*;
pub use matching::{reconcile, MatchError, Matcher, MatcherKind, ReconcileOptions};
pub use metrics::{compute_metrics, BenchmarkMetrics};
pub use normalize::PlantCleaner;
