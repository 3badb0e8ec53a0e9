pub mod etl;

pub use crate::domain::ports::{ConfigProvider, Pipeline, RecordCount, Storage};
pub use crate::utils::error::Result;
pub use etl::EtlEngine;
