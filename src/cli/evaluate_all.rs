use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use walkdir::WalkDir;

use crate::cli::evaluate::file_stem;
use crate::cli::export::{write_json, LabeledMetrics};
use crate::cli::input::{load_records, ReconcileArgs};
use crate::cli::OutputFormat;
use crate::metrics::{compute_metrics, reconcile_entries, BenchmarkMetrics};

#[derive(Args)]
pub struct EvaluateAllArgs {
    /// Reference inventory (CSV)
    #[arg(short, long, required = true)]
    pub reference: PathBuf,

    /// Directory searched recursively for system inventories (*.csv)
    #[arg(long, default_value = "outputs")]
    pub outputs_dir: PathBuf,

    /// Directory for all_metrics.json
    #[arg(short, long, default_value = "results/summary")]
    pub output: PathBuf,

    #[command(flatten)]
    pub reconcile: ReconcileArgs,
}

/// Every regular `*.csv` file below `dir`, sorted by path.
///
/// Symbolic links are not followed.
pub fn find_csv_files(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let is_csv = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if entry.file_type().is_file() && is_csv {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// `parent/stem` label of an evaluated file
fn label(path: &Path) -> String {
    let parent = path
        .parent()
        .and_then(Path::file_name)
        .map(|p| p.to_string_lossy().into_owned());
    match parent {
        Some(parent) => format!("{parent}/{}", file_stem(path)),
        None => file_stem(path),
    }
}

pub fn run(args: EvaluateAllArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let cleaner = args.reconcile.cleaner()?;
    let options = args.reconcile.reconcile_options()?;
    let kind = args.reconcile.matcher;

    let reference = load_records(&args.reference, &cleaner)?;
    let files = find_csv_files(&args.outputs_dir)
        .with_context(|| format!("Failed to scan {}", args.outputs_dir.display()))?;
    if verbose {
        eprintln!(
            "Evaluating {} files under {} against {} reference plants",
            files.len(),
            args.outputs_dir.display(),
            reference.len()
        );
    }

    let mut results: Vec<(String, BenchmarkMetrics)> = Vec::new();
    for path in &files {
        // A file that cannot be loaded (empty, missing columns) is skipped
        let system = match load_records(path, &cleaner) {
            Ok(system) => system,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Skipping: {e:#}");
                continue;
            }
        };
        let entries = reconcile_entries(kind, &reference, &system, &options)?;
        results.push((label(path), compute_metrics(&entries)));
    }

    let summary: Vec<LabeledMetrics> = results
        .iter()
        .map(|(label, metrics)| LabeledMetrics::new(label.clone(), kind.as_str(), metrics))
        .collect();
    let summary_path = args.output.join("all_metrics.json");
    write_json(&summary_path, &summary)?;

    match format {
        OutputFormat::Text => print_text(&results, &summary_path),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => print_tsv(&results),
    }

    Ok(())
}

fn print_text(results: &[(String, BenchmarkMetrics)], summary_path: &Path) {
    for (label, m) in results {
        println!(
            "{label:<50}  cov={:.1}%  prec={:.1}%  F1={:.1}%  ({}/{})",
            m.coverage * 100.0,
            m.precision * 100.0,
            m.f1 * 100.0,
            m.n_matched,
            m.n_reference
        );
    }
    println!("\nSummary: {}", summary_path.display());
}

fn print_tsv(results: &[(String, BenchmarkMetrics)]) {
    println!("label\tcoverage\tprecision\tf1\tn_matched\tn_reference\tn_system");
    for (label, m) in results {
        println!(
            "{label}\t{:.4}\t{:.4}\t{:.4}\t{}\t{}\t{}",
            m.coverage, m.precision, m.f1, m.n_matched, m.n_reference, m.n_system
        );
    }
}
