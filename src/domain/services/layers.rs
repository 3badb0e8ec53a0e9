//! Renderer payload: per-year marker layers, choropleth statistics and legend data.
//!
//! The HTML map itself is drawn elsewhere; everything here is plain data and
//! deterministic, so two runs over the same input serialise identically.

use crate::domain::model::{
    AggregateStat, CategorizedListing, Centroid, GroupKey, GroupValue, PriceTier,
    QuantileBoundaries,
};
use crate::domain::services::coordinates::{CoordinateTable, BERLIN_CENTER};
use crate::domain::services::enricher::PostalLookup;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// A named region from the boundary file.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRegion {
    pub name: String,
    pub district: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    Listing,
    PostalCode,
    Neighborhood,
    District,
    CityCenter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub position_source: PositionSource,
    pub radius: u8,
    pub color: &'static str,
    pub tier: PriceTier,
    pub tier_label: &'static str,
    pub price: f64,
    pub size: Option<f64>,
    pub price_per_area: Option<f64>,
    pub district: Option<String>,
    pub postal_code: Option<String>,
    pub neighborhood: Option<String>,
    pub year: Option<i32>,
    pub rooms: Option<f64>,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearLayer {
    pub year: i32,
    pub name: String,
    pub total_listings: usize,
    pub shown: bool,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborhoodStats {
    pub name: String,
    #[serde(flatten)]
    pub stats: AggregateStat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionStats {
    pub name: String,
    pub district: Option<String>,
    pub stats: Option<AggregateStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierLegend {
    pub tier: PriceTier,
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub boundaries: QuantileBoundaries,
    pub tiers: Vec<TierLegend>,
    pub total_listings: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPayload {
    pub legend: Legend,
    pub year_layers: Vec<YearLayer>,
    pub neighborhoods: Vec<NeighborhoodStats>,
    /// Present only when a boundary file was supplied.
    pub regions: Option<Vec<RegionStats>>,
}

pub fn marker_radius(size: Option<f64>) -> u8 {
    match size {
        Some(size) if size <= 40.0 => 5,
        Some(size) if size <= 80.0 => 7,
        _ => 10,
    }
}

/// Evenly strided, deterministic pick of at most `cap` items.
pub fn strided_sample<T>(items: &[T], cap: usize) -> Vec<&T> {
    if items.len() <= cap {
        return items.iter().collect();
    }
    (0..cap).map(|i| &items[i * items.len() / cap]).collect()
}

/// Fallback chain for a marker position when the listing has no coordinates.
pub struct MarkerPositioner<'a> {
    postal_lookup: &'a PostalLookup,
    neighborhoods: &'a CoordinateTable,
    districts: &'a CoordinateTable,
}

impl<'a> MarkerPositioner<'a> {
    pub fn new(
        postal_lookup: &'a PostalLookup,
        neighborhoods: &'a CoordinateTable,
        districts: &'a CoordinateTable,
    ) -> Self {
        Self {
            postal_lookup,
            neighborhoods,
            districts,
        }
    }

    pub fn position(&self, listing: &CategorizedListing) -> (Centroid, PositionSource) {
        let record = &listing.listing;

        if let Some(coordinates) = record.coordinates() {
            return (coordinates, PositionSource::Listing);
        }
        if let Some(centroid) = record
            .postal_code
            .as_deref()
            .and_then(|code| self.postal_lookup.centroid(code))
        {
            return (centroid, PositionSource::PostalCode);
        }
        if let Some(centroid) = record
            .neighborhood
            .as_deref()
            .and_then(|name| self.neighborhoods.lookup(name))
        {
            return (centroid, PositionSource::Neighborhood);
        }
        if let Some(centroid) = record
            .district
            .as_deref()
            .and_then(|name| self.districts.lookup(name))
        {
            return (centroid, PositionSource::District);
        }
        (BERLIN_CENTER, PositionSource::CityCenter)
    }
}

fn build_marker(listing: &CategorizedListing, positioner: &MarkerPositioner<'_>) -> Marker {
    let (position, position_source) = positioner.position(listing);
    let record = &listing.listing;

    Marker {
        lat: position.lat,
        lon: position.lon,
        position_source,
        radius: marker_radius(record.size),
        color: listing.tier.color(),
        tier: listing.tier,
        tier_label: listing.tier.label(),
        price: listing.price,
        size: record.size,
        price_per_area: listing.price_per_area,
        district: record.district.clone(),
        postal_code: record.postal_code.clone(),
        neighborhood: record.neighborhood.clone(),
        year: record.year,
        rooms: record.rooms,
        tooltip: format!(
            "{:.0}€ | {}",
            listing.price,
            record.district.as_deref().unwrap_or("Unknown")
        ),
    }
}

pub fn build_year_layers(
    listings: &[CategorizedListing],
    positioner: &MarkerPositioner<'_>,
    sample_size: usize,
) -> Vec<YearLayer> {
    let mut by_year: BTreeMap<i32, Vec<&CategorizedListing>> = BTreeMap::new();
    for listing in listings {
        if let Some(year) = listing.listing.year {
            by_year.entry(year).or_default().push(listing);
        }
    }

    let latest = by_year.keys().next_back().copied();
    by_year
        .into_iter()
        .map(|(year, year_listings)| {
            let sample = strided_sample(&year_listings, sample_size);
            tracing::debug!(
                "Year {}: {} listings, {} markers",
                year,
                year_listings.len(),
                sample.len()
            );
            YearLayer {
                year,
                name: format!("Angebote {} ({} Stück)", year, year_listings.len()),
                total_listings: year_listings.len(),
                shown: Some(year) == latest,
                markers: sample
                    .into_iter()
                    .map(|listing| build_marker(listing, positioner))
                    .collect(),
            }
        })
        .collect()
}

/// Reads per-neighborhood statistics off an aggregate grouped by neighborhood.
pub fn neighborhood_stats(by_neighborhood: &BTreeMap<GroupKey, AggregateStat>) -> Vec<NeighborhoodStats> {
    by_neighborhood
        .iter()
        .filter_map(|(key, stats)| match key.as_slice() {
            [GroupValue::Text(name)] => Some(NeighborhoodStats {
                name: name.clone(),
                stats: stats.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Exact-name join of boundary regions against neighborhood statistics.
/// Regions without listings keep `stats: None`.
pub fn join_regions(regions: &[BoundaryRegion], stats: &[NeighborhoodStats]) -> Vec<RegionStats> {
    let by_name: BTreeMap<&str, &AggregateStat> =
        stats.iter().map(|s| (s.name.as_str(), &s.stats)).collect();

    let joined: Vec<RegionStats> = regions
        .iter()
        .map(|region| RegionStats {
            name: region.name.clone(),
            district: region.district.clone(),
            stats: by_name.get(region.name.as_str()).map(|s| (*s).clone()),
        })
        .collect();

    let with_data = joined.iter().filter(|r| r.stats.is_some()).count();
    tracing::info!(
        "🗺️ Choropleth data: {} of {} Ortsteile with listings",
        with_data,
        joined.len()
    );
    joined
}

pub fn build_legend(boundaries: QuantileBoundaries, listings: &[CategorizedListing]) -> Legend {
    let years = listings.iter().filter_map(|l| l.listing.year);
    Legend {
        boundaries,
        tiers: PriceTier::ALL
            .iter()
            .map(|&tier| TierLegend {
                tier,
                label: tier.label(),
                color: tier.color(),
            })
            .collect(),
        total_listings: listings.len(),
        first_year: years.clone().min(),
        last_year: years.max(),
    }
}
