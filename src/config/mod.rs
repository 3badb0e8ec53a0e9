pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "berlin-housing-etl")]
#[command(about = "Build the Berlin PLZ → Ortsteil mapping with coordinates")]
pub struct CliConfig {
    #[arg(long, default_value = "data/raw/wohnlagen_enriched.csv")]
    pub postal_records: String,

    #[arg(long, default_value = "data/processed")]
    pub output_path: String,

    #[arg(long, default_value = "berlin_plz_mapping_detailed.csv")]
    pub detailed_filename: String,

    #[arg(long, default_value = "berlin_plz_mapping_enhanced.csv")]
    pub simplified_filename: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Older PLZ → Bezirk mapping to compare the new mapping against")]
    pub previous_mapping: Option<String>,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn postal_records_path(&self) -> &str {
        &self.postal_records
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn detailed_filename(&self) -> &str {
        &self.detailed_filename
    }

    fn simplified_filename(&self) -> &str {
        &self.simplified_filename
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_existing_file("postal_records", &self.postal_records)?;
        validation::validate_path("output_path", &self.output_path)?;
        if let Some(path) = &self.previous_mapping {
            validation::validate_existing_file("previous_mapping", path)?;
        }
        validation::validate_file_extensions(
            "output filenames",
            &[self.detailed_filename.clone(), self.simplified_filename.clone()],
            &["csv"],
        )?;
        if self.detailed_filename == self.simplified_filename {
            return Err(crate::utils::error::EtlError::ConfigValidationError {
                field: "simplified_filename".to_string(),
                message: "detailed and simplified mapping must use different files".to_string(),
            });
        }
        Ok(())
    }
}
