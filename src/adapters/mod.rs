// Adapters layer: concrete readers and writers for the files the pipelines touch.

pub mod boundaries;
pub mod csv_source;
pub mod export;
