use clap::Parser;
use tracing_subscriber::EnvFilter;

use plant_recon::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("plant_recon=debug,info")
    } else {
        EnvFilter::new("plant_recon=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Compare(args) => {
            cli::compare::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Evaluate(args) => {
            cli::evaluate::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::EvaluateAll(args) => {
            cli::evaluate_all::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
