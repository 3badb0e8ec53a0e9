use berlin_housing_etl::app::mapping_report;
use berlin_housing_etl::utils::{logger, validation::Validate};
use berlin_housing_etl::{CliConfig, EtlEngine, LocalStorage, MappingPipeline};
use clap::Parser;
use std::path::Path;

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting berlin-housing-etl PLZ mapping");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code());
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let previous_mapping = config.previous_mapping.clone();

    // 創建存儲和管道
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = MappingPipeline::new(storage, config);

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run() {
        Ok(output_path) => {
            tracing::info!("✅ PLZ mapping completed successfully!");
            println!("✅ PLZ mapping completed successfully!");
            println!("📁 Output saved to: {}", output_path);

            if let Some(previous) = previous_mapping {
                match mapping_report::compare_mapping_files(Path::new(&previous), Path::new(&output_path)) {
                    Ok(comparison) => println!("\n{}", mapping_report::render_text(&comparison)),
                    Err(e) => tracing::warn!("⚠️ Could not compare with {}: {}", previous, e),
                }
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ PLZ mapping failed: {} (Category: {:?}, Severity: {:?})",
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
