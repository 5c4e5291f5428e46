use std::path::PathBuf;

use clap::Args;

use crate::cli::export::{create_file, outcome_row, write_outcomes, OUTCOME_HEADERS};
use crate::cli::input::{load_records, ReconcileArgs};
use crate::cli::OutputFormat;
use crate::core::outcome::Outcome;
use crate::core::record::Record;
use crate::matching::{reconcile, reconcile_grouped, GroupResult, StatusCounts};

#[derive(Args)]
pub struct CompareArgs {
    /// First inventory (CSV)
    #[arg(required = true)]
    pub file_a: PathBuf,

    /// Second inventory (CSV)
    #[arg(required = true)]
    pub file_b: PathBuf,

    /// Only pair records within the same province and fuel
    #[arg(long)]
    pub grouped: bool,

    /// Write the row-per-outcome results table to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub reconcile: ReconcileArgs,
}

pub fn run(args: CompareArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let cleaner = args.reconcile.cleaner()?;
    let options = args.reconcile.reconcile_options()?;

    let a = load_records(&args.file_a, &cleaner)?;
    let b = load_records(&args.file_b, &cleaner)?;

    if verbose {
        eprintln!("File A: {} records from {}", a.len(), args.file_a.display());
        eprintln!("File B: {} records from {}", b.len(), args.file_b.display());
        eprintln!("Matcher: {}", args.reconcile.matcher);
    }

    let kind = args.reconcile.matcher;
    let (outcomes, groups) = if args.grouped {
        let groups = reconcile_grouped(kind, &a, &b, &options)?;
        let outcomes: Vec<Outcome> = groups.iter().flat_map(|g| g.outcomes.clone()).collect();
        (outcomes, Some(groups))
    } else {
        (reconcile(kind, &a, &b, &options)?, None)
    };

    let counts = match &groups {
        Some(groups) => groups.iter().fold(StatusCounts::default(), |mut total, g| {
            total.merge(&g.counts);
            total
        }),
        None => StatusCounts::from_outcomes(&outcomes, options.capacity_tolerance),
    };
    tracing::info!(?counts, "Reconciliation complete");

    if let Some(path) = &args.output {
        write_outcomes(
            create_file(path)?,
            &outcomes,
            &a,
            &b,
            options.capacity_tolerance,
        )?;
        if verbose {
            eprintln!("Results written to {}", path.display());
        }
    }

    match format {
        OutputFormat::Text => print_text(&args, &counts, groups.as_deref()),
        OutputFormat::Json => print_json(&args, &counts, groups.as_deref(), &outcomes)?,
        OutputFormat::Tsv => print_tsv(&outcomes, &a, &b, options.capacity_tolerance),
    }

    Ok(())
}

fn print_counts(counts: &StatusCounts) {
    println!("  Matched:                {}", counts.matched);
    println!("  Matched (Diff):         {}", counts.matched_exact_diff);
    println!("  Matched (Fuzzy):        {}", counts.matched_fuzzy);
    println!("  Matched (Fuzzy) (Diff): {}", counts.matched_fuzzy_diff);
    println!("  Mismatched:             {}", counts.mismatched);
    println!("  Only in A:              {}", counts.only_in_a);
    println!("  Only in B:              {}", counts.only_in_b);
    println!("  Total rows:             {}", counts.total_rows);
}

fn print_text(args: &CompareArgs, counts: &StatusCounts, groups: Option<&[GroupResult]>) {
    println!("Reconciliation Results");
    println!("{}", "=".repeat(60));
    println!("\nFile A: {}", args.file_a.display());
    println!("File B: {}", args.file_b.display());
    println!("Matcher: {}", args.reconcile.matcher);

    if let Some(groups) = groups {
        println!("\nGroups ({}):", groups.len());
        for group in groups {
            println!(
                "  {:<30} {:<20} pairs: {:>4}  only A: {:>4}  only B: {:>4}",
                display_key(&group.province),
                display_key(&group.fuel),
                group.counts.pairs(),
                group.counts.only_in_a,
                group.counts.only_in_b,
            );
        }
    }

    println!("\nStatus counts:");
    print_counts(counts);
}

fn display_key(value: &str) -> &str {
    if value.is_empty() {
        "(unknown)"
    } else {
        value
    }
}

fn print_json(
    args: &CompareArgs,
    counts: &StatusCounts,
    groups: Option<&[GroupResult]>,
    outcomes: &[Outcome],
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "file_a": args.file_a.display().to_string(),
        "file_b": args.file_b.display().to_string(),
        "matcher": args.reconcile.matcher,
        "grouped": args.grouped,
        "counts": counts,
        "groups": groups.map(|groups| {
            groups
                .iter()
                .map(|g| serde_json::json!({
                    "province": g.province,
                    "fuel": g.fuel,
                    "counts": g.counts,
                }))
                .collect::<Vec<_>>()
        }),
        "outcomes": outcomes,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(outcomes: &[Outcome], a: &[Record], b: &[Record], capacity_tolerance: f64) {
    println!("{}", OUTCOME_HEADERS.join("\t"));
    for outcome in outcomes {
        println!("{}", outcome_row(outcome, a, b, capacity_tolerance).join("\t"));
    }
}
