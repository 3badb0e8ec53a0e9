use crate::domain::ports::{Pipeline, RecordCount};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitoring: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitoring: bool) -> Self {
        Self {
            pipeline,
            monitoring,
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<String> {
        let mut monitor = SystemMonitor::new(self.monitoring);
        tracing::info!("🚀 Starting ETL process...");
        monitor.log_phase("Start");

        // Extract
        tracing::info!("📥 Extracting data...");
        let raw_data = self.pipeline.extract()?;
        tracing::info!("Extracted {} records", raw_data.record_count());
        monitor.log_phase("Extract");

        // Transform
        tracing::info!("🔄 Transforming data...");
        let transformed = self.pipeline.transform(raw_data)?;
        tracing::info!("Transformed into {} records", transformed.record_count());
        monitor.log_phase("Transform");

        // Load
        tracing::info!("💾 Loading data...");
        let output_path = self.pipeline.load(transformed)?;
        tracing::info!("Output saved to: {}", output_path);
        monitor.log_phase("Load");

        monitor.log_final_stats();
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use std::cell::RefCell;

    struct CountingPipeline {
        calls: RefCell<Vec<&'static str>>,
        fail_transform: bool,
    }

    impl Pipeline for CountingPipeline {
        type Extracted = Vec<u32>;
        type Transformed = Vec<u32>;

        fn extract(&self) -> Result<Vec<u32>> {
            self.calls.borrow_mut().push("extract");
            Ok(vec![1, 2, 3])
        }

        fn transform(&self, data: Vec<u32>) -> Result<Vec<u32>> {
            self.calls.borrow_mut().push("transform");
            if self.fail_transform {
                return Err(EtlError::EmptyDatasetError {
                    message: "nothing left".to_string(),
                });
            }
            Ok(data.into_iter().filter(|v| v % 2 == 1).collect())
        }

        fn load(&self, result: Vec<u32>) -> Result<String> {
            self.calls.borrow_mut().push("load");
            Ok(format!("out/{}", result.len()))
        }
    }

    #[test]
    fn test_runs_phases_in_order() {
        let engine = EtlEngine::new(CountingPipeline {
            calls: RefCell::new(Vec::new()),
            fail_transform: false,
        });

        assert_eq!(engine.run().unwrap(), "out/2");
        assert_eq!(*engine.pipeline().calls.borrow(), vec!["extract", "transform", "load"]);
    }

    #[test]
    fn test_failure_skips_load() {
        let engine = EtlEngine::new_with_monitoring(
            CountingPipeline {
                calls: RefCell::new(Vec::new()),
                fail_transform: true,
            },
            true,
        );

        assert!(matches!(engine.run(), Err(EtlError::EmptyDatasetError { .. })));
        assert_eq!(*engine.pipeline().calls.borrow(), vec!["extract", "transform"]);
    }
}
