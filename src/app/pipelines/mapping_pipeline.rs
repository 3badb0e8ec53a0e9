use crate::adapters::csv_source;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::PostalRecord;
use crate::domain::services::{MappingBuilder, MappingOutput};
use crate::utils::error::Result;
use std::path::Path;

/// Raw address records → detailed and simplified PLZ mapping files.
pub struct MappingPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    builder: MappingBuilder,
}

impl<S: Storage, C: ConfigProvider> MappingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_builder(storage, config, MappingBuilder::default())
    }

    pub fn with_builder(storage: S, config: C, builder: MappingBuilder) -> Self {
        Self {
            storage,
            config,
            builder,
        }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for MappingPipeline<S, C> {
    type Extracted = Vec<PostalRecord>;
    type Transformed = MappingOutput;

    fn extract(&self) -> Result<Vec<PostalRecord>> {
        let path = Path::new(self.config.postal_records_path());
        tracing::info!("📂 Reading postal records from {}", path.display());
        csv_source::read_postal_records(path)
    }

    fn transform(&self, data: Vec<PostalRecord>) -> Result<MappingOutput> {
        Ok(self.builder.build(&data))
    }

    fn load(&self, result: MappingOutput) -> Result<String> {
        let detailed = self.config.detailed_filename();
        let simplified = self.config.simplified_filename();

        MappingBuilder::persist(&self.storage, &result.detailed, detailed)?;
        tracing::info!("📄 Detailed mapping: {} ({} PLZ)", detailed, result.detailed.len());

        MappingBuilder::persist(&self.storage, &result.simplified, simplified)?;
        tracing::info!("📄 Simplified mapping: {} ({} PLZ)", simplified, result.simplified.len());

        Ok(format!("{}/{}", self.config.output_path(), simplified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Default)]
    struct MockStorage {
        files: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl MockStorage {
        fn get_file(&self, path: &str) -> Option<String> {
            self.files
                .borrow()
                .get(path)
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for MockStorage {
        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.borrow_mut().insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        postal_records: String,
    }

    impl ConfigProvider for MockConfig {
        fn postal_records_path(&self) -> &str {
            &self.postal_records
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn detailed_filename(&self) -> &str {
            "detailed.csv"
        }

        fn simplified_filename(&self) -> &str {
            "simplified.csv"
        }
    }

    fn input_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn pipeline(file: &NamedTempFile) -> MappingPipeline<MockStorage, MockConfig> {
        MappingPipeline::new(
            MockStorage::default(),
            MockConfig {
                postal_records: file.path().display().to_string(),
            },
        )
    }

    #[test]
    fn test_full_pipeline_writes_both_files() {
        let file = input_file(
            "plz,strasse,ortsteil_neu,bezirk_neu\n\
             10115,Chausseestr,Mitte,Mitte\n\
             10115,Gartenstr,Wedding,Mitte\n\
             10115,Invalidenstr,Mitte,Mitte\n\
             1011,Kurz,Mitte,Mitte\n\
             13347,Seestr,Wedding,Mitte\n",
        );
        let pipeline = pipeline(&file);

        let records = pipeline.extract().unwrap();
        assert_eq!(records.len(), 5);

        let output = pipeline.transform(records).unwrap();
        assert_eq!(output.summary.records_discarded, 1);

        let path = pipeline.load(output).unwrap();
        assert_eq!(path, "out/simplified.csv");

        assert_eq!(
            pipeline.storage.get_file("detailed.csv").unwrap(),
            "PLZ,Ortsteil,Bezirk,Entries,Ortsteile_Count,Lat,Lon\n\
             10115,Mitte,Mitte,3,2,52.52,13.405\n\
             13347,Wedding,Mitte,1,1,52.55,13.365\n"
        );
        assert_eq!(
            pipeline.storage.get_file("simplified.csv").unwrap(),
            "PLZ,Ortsteil,Bezirk,Lat,Lon\n\
             10115,Mitte,Mitte,52.52,13.405\n\
             13347,Wedding,Mitte,52.55,13.365\n"
        );
    }

    #[test]
    fn test_missing_columns_fail_in_extract() {
        let file = input_file("plz,ortsteil\n10115,Mitte\n");
        let pipeline = pipeline(&file);

        let err = pipeline.extract().unwrap_err();
        match err {
            EtlError::MissingColumnsError { missing, .. } => {
                assert_eq!(missing, vec!["ortsteil_neu", "bezirk_neu"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(pipeline.storage.files.borrow().is_empty());
    }

    #[test]
    fn test_empty_input_writes_headers_only() {
        let file = input_file("plz,ortsteil_neu,bezirk_neu\n");
        let pipeline = pipeline(&file);

        let records = pipeline.extract().unwrap();
        let output = pipeline.transform(records).unwrap();
        pipeline.load(output).unwrap();

        assert_eq!(
            pipeline.storage.get_file("simplified.csv").unwrap(),
            "PLZ,Ortsteil,Bezirk,Lat,Lon\n"
        );
    }
}
