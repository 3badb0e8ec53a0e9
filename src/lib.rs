pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::{HeatmapPipeline, MappingPipeline};
pub use config::{cli::LocalStorage, toml_config::HeatmapConfig};
pub use core::etl::EtlEngine;
pub use utils::error::{EtlError, Result};
