use crate::utils::error::Result;

/// Output sink for pipeline results. Inputs are read by the adapters.
pub trait Storage {
    /// Replaces any existing file at `path`.
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn postal_records_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn detailed_filename(&self) -> &str;
    fn simplified_filename(&self) -> &str;
}

/// Number of records a pipeline stage carries, used for progress logging.
pub trait RecordCount {
    fn record_count(&self) -> usize;
}

impl<T> RecordCount for Vec<T> {
    fn record_count(&self) -> usize {
        self.len()
    }
}

pub trait Pipeline {
    type Extracted: RecordCount;
    type Transformed: RecordCount;

    fn extract(&self) -> Result<Self::Extracted>;
    fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    fn load(&self, result: Self::Transformed) -> Result<String>;
}
