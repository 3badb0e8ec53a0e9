use crate::domain::services::layers::DEFAULT_SAMPLE_SIZE;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub listings_path: String,
    /// Simplified PLZ mapping produced by the mapping run.
    pub mapping_path: Option<String>,
    /// GeoJSON with Ortsteil boundaries.
    pub boundaries_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    pub sample_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub json: Option<String>,
    pub neighborhood_csv: Option<String>,
    pub district_year_csv: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl HeatmapConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_path("source.listings_path", &self.source.listings_path)?;
        if let Some(path) = &self.source.mapping_path {
            validation::validate_path("source.mapping_path", path)?;
        }
        if let Some(path) = &self.source.boundaries_path {
            validation::validate_path("source.boundaries_path", path)?;
        }
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_positive_number("transform.sample_size", self.sample_size(), 1)?;

        if self.load.output_formats.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "load.output_formats".to_string(),
            });
        }
        for format in &self.load.output_formats {
            if !OUTPUT_FORMATS.contains(&format.as_str()) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "load.output_formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        OUTPUT_FORMATS.join(", ")
                    ),
                });
            }
        }

        validation::validate_file_extensions(
            "load.filenames",
            &[self.neighborhood_csv_filename(), self.district_year_csv_filename()],
            &["csv"],
        )?;
        validation::validate_file_extensions("load.filenames", &[self.json_filename()], &["json"])?;

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }

    pub fn sample_size(&self) -> usize {
        self.transform.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE)
    }

    pub fn writes(&self, format: &str) -> bool {
        self.load.output_formats.iter().any(|f| f == format)
    }

    fn filenames(&self) -> FilenameConfig {
        self.load.filenames.clone().unwrap_or_default()
    }

    pub fn json_filename(&self) -> String {
        self.filenames()
            .json
            .unwrap_or_else(|| "heatmap_layers.json".to_string())
    }

    pub fn neighborhood_csv_filename(&self) -> String {
        self.filenames()
            .neighborhood_csv
            .unwrap_or_else(|| "aggregates_ortsteil.csv".to_string())
    }

    pub fn district_year_csv_filename(&self) -> String {
        self.filenames()
            .district_year_csv
            .unwrap_or_else(|| "aggregates_bezirk_year.csv".to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl Validate for HeatmapConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
