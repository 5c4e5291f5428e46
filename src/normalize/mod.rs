//! Record cleaning that feeds the matchers.
//!
//! Raw inventories name the same plant in many ways ("Vĩnh Tân 4",
//! "VINH TAN IV Thermal Power Plant", ...). This module canonicalizes the
//! free-text columns and extracts numeric capacity:
//!
//! - [`PlantCleaner`]: validates a [`RawTable`] and produces [`Record`]s
//! - [`TextRules`]: compiled, ordered drop and substitution patterns
//! - [`CleanerConfig`]: the JSON form of those rules, with an embedded default
//! - [`parse_capacity`]: first number in a noisy capacity string
//!
//! ## Example
//!
//! ```rust
//! use plant_recon::normalize::PlantCleaner;
//! use plant_recon::parsing::table::RawTable;
//!
//! let cleaner = PlantCleaner::with_defaults().unwrap();
//! let table = RawTable::from_strs(
//!     &["Name", "Province", "Fuel", "Capacity", "Status"],
//!     &[&["Mông Dương II", "Quảng Ninh", "Coal", "1240 MW", "Operating"]],
//! );
//! let records = cleaner.clean_table(table).unwrap();
//! assert_eq!(records[0].name_clean, "mong duong 2");
//! assert_eq!(records[0].capacity_clean, Some(1240.0));
//! ```
//!
//! [`RawTable`]: crate::parsing::table::RawTable
//! [`Record`]: crate::core::record::Record

pub mod cleaner;
pub mod config;
pub mod text;

pub use cleaner::PlantCleaner;
pub use config::{CleanerConfig, CleanerError};
pub use text::{clean_text, parse_capacity, TextRules};
