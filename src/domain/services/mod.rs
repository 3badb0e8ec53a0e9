pub mod aggregator;
pub mod categorizer;
pub mod coordinates;
pub mod enricher;
pub mod layers;
pub mod mapping;
pub mod resolver;

pub use aggregator::aggregate;
pub use categorizer::{categorize, Categorization};
pub use coordinates::CoordinateTable;
pub use enricher::{enrich, PostalLookup};
pub use mapping::{MappingBuilder, MappingOutput};
pub use resolver::NeighborhoodResolver;
