use std::path::{Path, PathBuf};

use clap::Args;

use crate::cli::export::{create_file, write_entries, write_json, LabeledMetrics};
use crate::cli::input::{load_records, ReconcileArgs};
use crate::cli::OutputFormat;
use crate::metrics::{compute_metrics, format_metrics, reconcile_entries, BenchmarkMetrics};

#[derive(Args)]
pub struct EvaluateArgs {
    /// System inventory to evaluate (CSV)
    #[arg(required = true)]
    pub system: PathBuf,

    /// Reference inventory (CSV)
    #[arg(short, long, required = true)]
    pub reference: PathBuf,

    /// Directory for the reconciliation table and metrics JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub reconcile: ReconcileArgs,
}

pub fn run(args: EvaluateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let cleaner = args.reconcile.cleaner()?;
    let options = args.reconcile.reconcile_options()?;

    let reference = load_records(&args.reference, &cleaner)?;
    let system = load_records(&args.system, &cleaner)?;

    if verbose {
        eprintln!(
            "Reference: {} plants from {}",
            reference.len(),
            args.reference.display()
        );
        eprintln!("System:    {} plants from {}", system.len(), args.system.display());
    }

    let kind = args.reconcile.matcher;
    let entries = reconcile_entries(kind, &reference, &system, &options)?;
    let metrics = compute_metrics(&entries);

    if let Some(dir) = &args.output {
        let stem = file_stem(&args.system);
        let table_path = dir.join(format!("reconciliation_{stem}.csv"));
        let metrics_path = dir.join(format!("metrics_{stem}.json"));

        write_entries(create_file(&table_path)?, &entries)?;
        let labeled = LabeledMetrics::new(file_name(&args.system), kind.as_str(), &metrics);
        write_json(&metrics_path, &labeled)?;

        if verbose {
            eprintln!("Saved: {}, {}", table_path.display(), metrics_path.display());
        }
    }

    match format {
        OutputFormat::Text => print!("{}", format_metrics(&metrics)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&metrics)?),
        OutputFormat::Tsv => print_tsv(&metrics),
    }

    Ok(())
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "system".to_string(), |s| s.to_string_lossy().into_owned())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{v:.4}"))
}

fn print_tsv(metrics: &BenchmarkMetrics) {
    println!(
        "coverage\tprecision\tf1\tn_reference\tn_system\tn_matched\tn_exact\tn_fuzzy\tn_missed\tn_hallucinated\tfuel_accuracy\tstatus_accuracy\tprovince_accuracy\tcapacity_match_rate"
    );
    println!(
        "{:.4}\t{:.4}\t{:.4}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        metrics.coverage,
        metrics.precision,
        metrics.f1,
        metrics.n_reference,
        metrics.n_system,
        metrics.n_matched,
        metrics.n_exact,
        metrics.n_fuzzy,
        metrics.n_missed,
        metrics.n_hallucinated,
        optional(metrics.fuel_accuracy),
        optional(metrics.status_accuracy),
        optional(metrics.province_accuracy),
        optional(metrics.capacity_match_rate),
    );
}
