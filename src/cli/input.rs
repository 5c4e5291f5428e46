use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::core::record::Record;
use crate::matching::{MatcherKind, ReconcileOptions};
use crate::normalize::{CleanerConfig, PlantCleaner};
use crate::parsing::table::read_table;

/// Options shared by every command that reconciles two inventories
#[derive(Args, Debug, Clone)]
pub struct ReconcileArgs {
    /// Matching strategy
    #[arg(short, long, value_enum, default_value_t = MatcherKind::Optimal)]
    pub matcher: MatcherKind,

    /// Cleaning rules (JSON); the built-in rules are used when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reconciliation options (JSON)
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Minimum name similarity (0-100), overrides --options
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: Option<u8>,

    /// Capacity tolerance in MW, overrides --options
    #[arg(long)]
    pub tolerance: Option<f64>,
}

impl ReconcileArgs {
    /// Build the record cleaner from `--config` or the built-in rules
    pub fn cleaner(&self) -> anyhow::Result<PlantCleaner> {
        match &self.config {
            Some(path) => {
                let config = CleanerConfig::load_from_file(path).with_context(|| {
                    format!("Failed to load cleaning rules from {}", path.display())
                })?;
                Ok(PlantCleaner::new(&config)?)
            }
            None => Ok(PlantCleaner::with_defaults()?),
        }
    }

    /// Resolve reconciliation options: defaults, then `--options`, then flags
    pub fn reconcile_options(&self) -> anyhow::Result<ReconcileOptions> {
        let mut options = match &self.options {
            Some(path) => ReconcileOptions::load_from_file(path)
                .with_context(|| format!("Failed to load options from {}", path.display()))?,
            None => ReconcileOptions::default(),
        };
        if let Some(threshold) = self.threshold {
            options.similarity_threshold = threshold;
        }
        if let Some(tolerance) = self.tolerance {
            options.capacity_tolerance = tolerance;
        }
        options.validate()?;
        Ok(options)
    }
}

/// Read a CSV inventory and clean every row
pub fn load_records(path: &Path, cleaner: &PlantCleaner) -> anyhow::Result<Vec<Record>> {
    let table = read_table(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let records = cleaner
        .clean_table(table)
        .with_context(|| format!("Invalid inventory {}", path.display()))?;
    tracing::info!(path = %path.display(), records = records.len(), "Loaded inventory");
    Ok(records)
}
