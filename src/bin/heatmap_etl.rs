use berlin_housing_etl::core::Pipeline;
use berlin_housing_etl::utils::{logger, validation::Validate};
use berlin_housing_etl::{EtlEngine, HeatmapConfig, HeatmapPipeline, LocalStorage};
use clap::Parser;

#[derive(Parser)]
#[command(name = "heatmap-etl")]
#[command(about = "Categorize Berlin listings by price and build the map layers")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "heatmap-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log as JSON lines instead of the compact format
    #[arg(long)]
    json_logs: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the per-year marker sample size
    #[arg(long)]
    sample_size: Option<usize>,

    /// Dry run - extract and transform, write nothing
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match HeatmapConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if args.json_logs || config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting price heatmap ETL");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(sample_size) = args.sample_size {
        config.transform.sample_size = Some(sample_size);
        tracing::info!("🔧 Sample size overridden to: {}", sample_size);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code());
    }

    display_config_summary(&config, &args);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = HeatmapPipeline::new(storage, config);

    let result = if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        perform_dry_run(&pipeline)
    } else {
        EtlEngine::new_with_monitoring(pipeline, monitor_enabled).run()
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ Heatmap ETL completed successfully!");
            println!("✅ Heatmap ETL completed successfully!");
            println!("📁 Output: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Heatmap ETL failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn display_config_summary(config: &HeatmapConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Pipeline: {} v{}", config.pipeline.name, config.pipeline.version);
    println!("  Listings: {}", config.source.listings_path);
    println!(
        "  PLZ mapping: {}",
        config.source.mapping_path.as_deref().unwrap_or("(none)")
    );
    println!(
        "  Boundaries: {}",
        config.source.boundaries_path.as_deref().unwrap_or("(none)")
    );
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    println!("  Sample size per year: {}", config.sample_size());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
}

fn perform_dry_run(pipeline: &HeatmapPipeline<LocalStorage>) -> berlin_housing_etl::Result<String> {
    let sources = pipeline.extract()?;
    let output = pipeline.transform(sources)?;
    let legend = &output.payload.legend;

    println!("🔍 Dry run summary:");
    println!(
        "  Listings: {} read, {} dropped, {} categorized",
        output.enrichment.listings_read, output.enrichment.listings_dropped, legend.total_listings
    );
    println!(
        "  Quantiles: 25%={:.0}€, 50%={:.0}€, 75%={:.0}€",
        legend.boundaries.q25, legend.boundaries.q50, legend.boundaries.q75
    );
    for layer in &output.payload.year_layers {
        println!("  {}: {} markers", layer.name, layer.markers.len());
    }
    println!(
        "  Aggregates: {} Ortsteile, {} Bezirk/year groups",
        output.by_neighborhood.len(),
        output.by_district_year.len()
    );

    Ok(format!("{} (dry run, nothing written)", pipeline.config().output_path()))
}
