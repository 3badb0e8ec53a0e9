use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// library 與各 binary 的 target 都要列出
const TARGETS: [&str; 3] = ["berlin_housing_etl", "heatmap_etl", "compare_datasets"];

fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = TARGETS
            .iter()
            .map(|target| format!("{}={}", target, level))
            .collect();
        EnvFilter::new(directives.join(","))
    })
}

pub fn init_cli_logger(verbose: bool) {
    let filter = default_filter(if verbose { "debug" } else { "info" });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// 給批次排程使用的 JSON 格式日誌
pub fn init_json_logger(verbose: bool) {
    let filter = default_filter(if verbose { "debug" } else { "info" });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
