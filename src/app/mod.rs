pub mod compare;
pub mod mapping_report;
pub mod pipelines;
