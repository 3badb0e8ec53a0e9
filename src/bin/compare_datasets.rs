use anyhow::Context;
use berlin_housing_etl::app::compare;
use berlin_housing_etl::utils::logger;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "compare-datasets")]
#[command(about = "Compare row counts, columns and geographic completeness of two CSV files")]
struct Args {
    #[arg(default_value = "data/processed/berlin_housing_combined_final.csv")]
    left: PathBuf,

    #[arg(default_value = "data/processed/berlin_housing_combined_enriched_final.csv")]
    right: PathBuf,

    /// Print the comparison as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    tracing::info!("Comparing {} with {}", args.left.display(), args.right.display());

    let comparison = compare::compare_files(&args.left, &args.right)
        .with_context(|| format!("comparing {} and {}", args.left.display(), args.right.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        print!("{}", compare::render_text(&comparison));
    }

    Ok(())
}
