//! Readers for the tabular plant inventories fed to the cleaner.
//!
//! Inventories arrive as CSV files with a header row. Readers keep every
//! cell as text and leave interpretation (column validation, capacity
//! parsing, text normalization) to [`crate::normalize`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use plant_recon::parsing::table::read_table;
//! use std::path::Path;
//!
//! let table = read_table(Path::new("reference.csv")).unwrap();
//! println!("{} rows, columns: {:?}", table.len(), table.headers);
//! ```

pub mod table;
