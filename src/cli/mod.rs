//! Command-line interface for plant-recon.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **compare**: Reconcile two plant inventories and report per-status counts
//! - **evaluate**: Score a system inventory against a reference
//! - **evaluate-all**: Score every inventory under a directory
//!
//! ## Usage
//!
//! ```text
//! # Reconcile two inventories with the optimal matcher
//! plant-recon compare gem.csv ministry.csv --output results.csv
//!
//! # Greedy matching, restricted to province x fuel groups
//! plant-recon compare gem.csv ministry.csv --matcher phased --grouped
//!
//! # Benchmark metrics as JSON
//! plant-recon evaluate outputs/run1/model.csv --reference reference.csv --format json
//!
//! # Score every run and write results/summary/all_metrics.json
//! plant-recon evaluate-all --reference reference.csv --outputs-dir outputs
//! ```

use clap::{Parser, Subcommand};

pub mod compare;
pub mod evaluate;
pub mod evaluate_all;
pub mod export;
pub mod input;

#[derive(Parser)]
#[command(name = "plant-recon")]
#[command(author = "The plant-recon developers")]
#[command(version)]
#[command(about = "Reconcile power plant inventories and score them against a reference")]
#[command(
    long_about = "plant-recon matches the rows of two power plant inventories that describe the same plant.\n\nNames are normalized (case, diacritics, abbreviations) before matching, and pairs are chosen either:\n- globally, by minimizing the total cost of pairs and unmatched rows, or\n- greedily, exact matches first and then the most similar remaining name.\n\nThe evaluate commands turn the matches into coverage, precision, F1 and an error taxonomy."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile two inventories
    Compare(compare::CompareArgs),

    /// Evaluate one system inventory against a reference
    Evaluate(evaluate::EvaluateArgs),

    /// Evaluate every inventory in a directory against a reference
    EvaluateAll(evaluate_all::EvaluateAllArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
