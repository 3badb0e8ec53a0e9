use crate::adapters::{boundaries, csv_source, export};
use crate::config::toml_config::HeatmapConfig;
use crate::core::{Pipeline, RecordCount, Storage};
use crate::domain::model::{AggregateStat, GroupField, GroupKey, ListingRecord, SimplifiedMappingRow};
use crate::domain::services::enricher::EnrichmentStats;
use crate::domain::services::layers::{self, BoundaryRegion, MapPayload, MarkerPositioner};
use crate::domain::services::{aggregate, categorize, enrich, CoordinateTable, PostalLookup};
use crate::utils::error::{EtlError, Result};
use std::collections::BTreeMap;
use std::path::Path;

pub const DISTRICT_YEAR_FIELDS: [GroupField; 2] = [GroupField::District, GroupField::Year];
pub const NEIGHBORHOOD_FIELDS: [GroupField; 1] = [GroupField::Neighborhood];

#[derive(Debug, Clone, Default)]
pub struct HeatmapSources {
    pub listings: Vec<ListingRecord>,
    pub mapping: Vec<SimplifiedMappingRow>,
    pub regions: Option<Vec<BoundaryRegion>>,
}

impl RecordCount for HeatmapSources {
    fn record_count(&self) -> usize {
        self.listings.len()
    }
}

#[derive(Debug, Clone)]
pub struct HeatmapOutput {
    pub payload: MapPayload,
    pub by_neighborhood: BTreeMap<GroupKey, AggregateStat>,
    pub by_district_year: BTreeMap<GroupKey, AggregateStat>,
    pub enrichment: EnrichmentStats,
}

impl RecordCount for HeatmapOutput {
    fn record_count(&self) -> usize {
        self.payload.legend.total_listings
    }
}

/// Listings → price tiers, aggregate tables and the map payload.
pub struct HeatmapPipeline<S: Storage> {
    pub(crate) storage: S,
    pub(crate) config: HeatmapConfig,
    neighborhoods: CoordinateTable,
    districts: CoordinateTable,
}

impl<S: Storage> HeatmapPipeline<S> {
    pub fn new(storage: S, config: HeatmapConfig) -> Self {
        Self {
            storage,
            config,
            neighborhoods: CoordinateTable::berlin_neighborhoods(),
            districts: CoordinateTable::berlin_districts(),
        }
    }

    pub fn config(&self) -> &HeatmapConfig {
        &self.config
    }
}

impl<S: Storage> Pipeline for HeatmapPipeline<S> {
    type Extracted = HeatmapSources;
    type Transformed = HeatmapOutput;

    fn extract(&self) -> Result<HeatmapSources> {
        let source = &self.config.source;

        tracing::info!("📂 Reading listings from {}", source.listings_path);
        let listings = csv_source::read_listings(Path::new(&source.listings_path))?;

        let mapping = match &source.mapping_path {
            Some(path) => {
                let rows = csv_source::read_simplified_mapping(Path::new(path))?;
                tracing::info!("📍 Loaded PLZ mapping with {} entries", rows.len());
                rows
            }
            None => {
                tracing::warn!("⚠️ No PLZ mapping configured, Ortsteile are not filled in");
                Vec::new()
            }
        };

        let regions = match &source.boundaries_path {
            Some(path) => Some(boundaries::read_regions(Path::new(path))?),
            None => None,
        };

        Ok(HeatmapSources {
            listings,
            mapping,
            regions,
        })
    }

    fn transform(&self, data: HeatmapSources) -> Result<HeatmapOutput> {
        let lookup = PostalLookup::new(data.mapping);
        let (listings, enrichment) = enrich(data.listings, &lookup);
        tracing::info!(
            "🧹 {} of {} listings usable, {} Ortsteile filled from PLZ",
            listings.len(),
            enrichment.listings_read,
            enrichment.neighborhoods_filled
        );

        let categorization = categorize(listings);
        let boundaries = categorization.boundaries.ok_or_else(|| EtlError::EmptyDatasetError {
            message: format!(
                "no priced listings left in {} after cleaning",
                self.config.source.listings_path
            ),
        })?;
        let listings = categorization.listings;

        let by_neighborhood = aggregate(&listings, &NEIGHBORHOOD_FIELDS);
        let by_district_year = aggregate(&listings, &DISTRICT_YEAR_FIELDS);

        let positioner = MarkerPositioner::new(&lookup, &self.neighborhoods, &self.districts);
        let year_layers = layers::build_year_layers(&listings, &positioner, self.config.sample_size());
        let neighborhoods = layers::neighborhood_stats(&by_neighborhood);
        let regions = data
            .regions
            .map(|regions| layers::join_regions(&regions, &neighborhoods));

        let payload = MapPayload {
            legend: layers::build_legend(boundaries, &listings),
            year_layers,
            neighborhoods,
            regions,
        };

        Ok(HeatmapOutput {
            payload,
            by_neighborhood,
            by_district_year,
            enrichment,
        })
    }

    fn load(&self, result: HeatmapOutput) -> Result<String> {
        let json_filename = self.config.json_filename();

        if self.config.writes("json") {
            let data = export::encode_payload(&result.payload)?;
            self.storage.write_file(&json_filename, &data)?;
            tracing::info!("🗺️ Map payload: {} ({} year layers)", json_filename, result.payload.year_layers.len());
        }

        if self.config.writes("csv") {
            let neighborhood_csv = self.config.neighborhood_csv_filename();
            let data = export::encode_aggregates(&NEIGHBORHOOD_FIELDS, &result.by_neighborhood)?;
            self.storage.write_file(&neighborhood_csv, &data)?;
            tracing::info!("📊 Ortsteil aggregates: {} ({} rows)", neighborhood_csv, result.by_neighborhood.len());

            let district_year_csv = self.config.district_year_csv_filename();
            let data = export::encode_aggregates(&DISTRICT_YEAR_FIELDS, &result.by_district_year)?;
            self.storage.write_file(&district_year_csv, &data)?;
            tracing::info!("📊 Bezirk/year aggregates: {} ({} rows)", district_year_csv, result.by_district_year.len());
        }

        Ok(self.config.output_path().to_string())
    }
}
