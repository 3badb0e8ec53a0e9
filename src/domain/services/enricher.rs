use crate::domain::model::{Centroid, ListingRecord, SimplifiedMappingRow};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentStats {
    pub listings_read: usize,
    pub listings_dropped: usize,
    pub neighborhoods_filled: usize,
}

/// Postal code join against a persisted simplified mapping.
#[derive(Debug, Clone, Default)]
pub struct PostalLookup {
    rows: HashMap<String, SimplifiedMappingRow>,
}

impl PostalLookup {
    pub fn new(rows: Vec<SimplifiedMappingRow>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| (row.postal_code.clone(), row))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, postal_code: &str) -> Option<&SimplifiedMappingRow> {
        self.rows.get(postal_code)
    }

    pub fn centroid(&self, postal_code: &str) -> Option<Centroid> {
        self.get(postal_code).and_then(SimplifiedMappingRow::centroid)
    }
}

/// Drops listings the map cannot use and fills a missing neighborhood from the
/// postal code mapping. True coordinates are never touched.
pub fn enrich(listings: Vec<ListingRecord>, lookup: &PostalLookup) -> (Vec<ListingRecord>, EnrichmentStats) {
    let mut stats = EnrichmentStats {
        listings_read: listings.len(),
        ..EnrichmentStats::default()
    };

    let mut kept = Vec::with_capacity(listings.len());
    for mut listing in listings {
        // NaN 與 inf 視同缺值
        listing.price = listing.price.filter(|v| v.is_finite());
        listing.size = listing.size.filter(|v| v.is_finite());
        listing.lat = listing.lat.filter(|v| v.is_finite());
        listing.lon = listing.lon.filter(|v| v.is_finite());

        let usable = listing.price.is_some()
            && listing.size.is_some()
            && listing.district.is_some()
            && listing.year.is_some();
        if !usable {
            stats.listings_dropped += 1;
            continue;
        }

        if listing.neighborhood.is_none() {
            let row = listing.postal_code.as_deref().and_then(|code| lookup.get(code));
            if let Some(row) = row {
                listing.neighborhood = Some(row.neighborhood.clone());
                stats.neighborhoods_filled += 1;
            }
        }
        kept.push(listing);
    }

    (kept, stats)
}
