use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error(
        "Missing required columns in {source_name}: [{}] (available: [{}])",
        .missing.join(", "),
        .available.join(", ")
    )]
    MissingColumnsError {
        source_name: String,
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("Empty dataset: {message}")]
    EmptyDatasetError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,      // 警告，但成功
            ErrorSeverity::Medium => 2,   // 處理錯誤
            ErrorSeverity::High => 1,     // 輸入或配置錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_)
            | EtlError::MissingColumnsError { .. }
            | EtlError::EmptyDatasetError { .. } => ErrorCategory::Input,
            EtlError::SerializationError(_) | EtlError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::CsvError(_) => "Check that the input file is valid, comma separated CSV with a header row",
            EtlError::IoError(_) => "Check that the file exists and that the output directory is writable",
            EtlError::SerializationError(_) => "Check the boundary file or JSON output for malformed content",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => "Review the configuration values and try again",
            EtlError::MissingConfigError { .. } => "Add the missing setting to the configuration file or command line",
            EtlError::MissingColumnsError { .. } => "Make sure the input file carries all required columns (see available columns above)",
            EtlError::EmptyDatasetError { .. } => "Check the input filters; at least one listing with a price is required",
            EtlError::ProcessingError { .. } => "Run again with --verbose to see which step failed",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::MissingColumnsError {
                source_name,
                missing,
                ..
            } => format!(
                "Input file '{}' is missing column(s): {}",
                source_name,
                missing.join(", ")
            ),
            EtlError::EmptyDatasetError { message } => {
                format!("Nothing to process: {}", message)
            }
            EtlError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_both_sides() {
        let err = EtlError::MissingColumnsError {
            source_name: "listings.csv".to_string(),
            missing: vec!["price".to_string(), "year".to_string()],
            available: vec!["size".to_string(), "district".to_string()],
        };

        let message = err.to_string();
        assert!(message.contains("price, year"));
        assert!(message.contains("size, district"));
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = EtlError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().starts_with("File access failed"));
        assert_eq!(err.severity().exit_code(), 3);
    }

    #[test]
    fn test_empty_dataset_exit_code() {
        let err = EtlError::EmptyDatasetError {
            message: "no listings".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity().exit_code(), 1);
    }
}
