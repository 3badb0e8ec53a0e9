pub mod heatmap_pipeline;
pub mod mapping_pipeline;

pub use heatmap_pipeline::{HeatmapOutput, HeatmapPipeline, HeatmapSources};
pub use mapping_pipeline::MappingPipeline;
