use serde::{Deserialize, Serialize};
use std::fmt;

/// 一筆原始 wohnlagen 資料，只取出解析需要的欄位
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostalRecord {
    #[serde(rename = "plz", default)]
    pub postal_code: Option<String>,
    #[serde(rename = "ortsteil_neu", default)]
    pub neighborhood: Option<String>,
    #[serde(rename = "bezirk_neu", default)]
    pub district: Option<String>,
}

impl PostalRecord {
    pub fn new(postal_code: &str, neighborhood: &str, district: &str) -> Self {
        Self {
            postal_code: Some(postal_code.to_string()),
            neighborhood: Some(neighborhood.to_string()),
            district: Some(district.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub lat: f64,
    pub lon: f64,
}

impl Centroid {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Resolved mapping for one postal code.
#[derive(Debug, Clone, PartialEq)]
pub struct PostalMappingEntry {
    pub postal_code: String,
    pub neighborhood: String,
    pub district: Option<String>,
    pub record_count: usize,
    pub neighborhood_count: usize,
    pub centroid: Option<Centroid>,
}

/// Detailed mapping row: `PLZ,Ortsteil,Bezirk,Entries,Ortsteile_Count,Lat,Lon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedMappingRow {
    #[serde(rename = "PLZ")]
    pub postal_code: String,
    #[serde(rename = "Ortsteil")]
    pub neighborhood: String,
    #[serde(rename = "Bezirk")]
    pub district: Option<String>,
    #[serde(rename = "Entries")]
    pub record_count: usize,
    #[serde(rename = "Ortsteile_Count")]
    pub neighborhood_count: usize,
    #[serde(rename = "Lat")]
    pub lat: Option<f64>,
    #[serde(rename = "Lon")]
    pub lon: Option<f64>,
}

/// Simplified mapping row: `PLZ,Ortsteil,Bezirk,Lat,Lon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedMappingRow {
    #[serde(rename = "PLZ")]
    pub postal_code: String,
    #[serde(rename = "Ortsteil")]
    pub neighborhood: String,
    #[serde(rename = "Bezirk")]
    pub district: Option<String>,
    #[serde(rename = "Lat")]
    pub lat: Option<f64>,
    #[serde(rename = "Lon")]
    pub lon: Option<f64>,
}

/// Older district-only mapping: `PLZ,Bezirk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousMappingRow {
    #[serde(rename = "PLZ")]
    pub postal_code: String,
    #[serde(rename = "Bezirk")]
    pub district: Option<String>,
}

impl SimplifiedMappingRow {
    pub fn centroid(&self) -> Option<Centroid> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Centroid::new(lat, lon)),
            _ => None,
        }
    }
}

impl From<&PostalMappingEntry> for DetailedMappingRow {
    fn from(entry: &PostalMappingEntry) -> Self {
        Self {
            postal_code: entry.postal_code.clone(),
            neighborhood: entry.neighborhood.clone(),
            district: entry.district.clone(),
            record_count: entry.record_count,
            neighborhood_count: entry.neighborhood_count,
            lat: entry.centroid.map(|c| c.lat),
            lon: entry.centroid.map(|c| c.lon),
        }
    }
}

impl From<&PostalMappingEntry> for SimplifiedMappingRow {
    fn from(entry: &PostalMappingEntry) -> Self {
        Self {
            postal_code: entry.postal_code.clone(),
            neighborhood: entry.neighborhood.clone(),
            district: entry.district.clone(),
            lat: entry.centroid.map(|c| c.lat),
            lon: entry.centroid.map(|c| c.lon),
        }
    }
}

/// 房屋刊登資料；偶爾缺值的欄位一律是 Option
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListingRecord {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub size: Option<f64>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(rename = "ortsteil", default)]
    pub neighborhood: Option<String>,
    #[serde(rename = "plz", default)]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "whole_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub rooms: Option<f64>,
}

// 年份常以 2021.0 形式匯出
fn whole_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<f64> = csv::invalid_option(deserializer)?;
    Ok(value
        .filter(|year| year.is_finite() && year.fract() == 0.0)
        .map(|year| year as i32))
}

impl ListingRecord {
    pub fn new(price: f64, size: f64, district: &str, year: i32) -> Self {
        Self {
            price: Some(price),
            size: Some(size),
            district: Some(district.to_string()),
            neighborhood: None,
            postal_code: None,
            lat: None,
            lon: None,
            year: Some(year),
            rooms: None,
        }
    }

    pub fn with_neighborhood(mut self, neighborhood: &str) -> Self {
        self.neighborhood = Some(neighborhood.to_string());
        self
    }

    pub fn with_postal_code(mut self, postal_code: &str) -> Self {
        self.postal_code = Some(postal_code.to_string());
        self
    }

    pub fn with_coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    pub fn coordinates(&self) -> Option<Centroid> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Centroid::new(lat, lon))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum PriceTier {
    Budget = 1,
    BudgetMid = 2,
    MidUpper = 3,
    Premium = 4,
}

impl PriceTier {
    pub const ALL: [PriceTier; 4] = [
        PriceTier::Budget,
        PriceTier::BudgetMid,
        PriceTier::MidUpper,
        PriceTier::Premium,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceTier::Budget => "Günstig",
            PriceTier::BudgetMid => "Günstig-Mittel",
            PriceTier::MidUpper => "Mittel-Teuer",
            PriceTier::Premium => "Teuer",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PriceTier::Budget => "green",
            PriceTier::BudgetMid => "lightgreen",
            PriceTier::MidUpper => "orange",
            PriceTier::Premium => "red",
        }
    }
}

impl From<PriceTier> for u8 {
    fn from(tier: PriceTier) -> Self {
        tier.rank()
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.rank(), self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantileBoundaries {
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
}

impl QuantileBoundaries {
    /// Lower bound inclusive step function over the three boundaries.
    pub fn tier_for(&self, price: f64) -> PriceTier {
        if price <= self.q25 {
            PriceTier::Budget
        } else if price <= self.q50 {
            PriceTier::BudgetMid
        } else if price <= self.q75 {
            PriceTier::MidUpper
        } else {
            PriceTier::Premium
        }
    }
}

/// A listing that passed categorization: it has a definite price and a tier.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizedListing {
    pub listing: ListingRecord,
    pub price: f64,
    pub tier: PriceTier,
    pub price_per_area: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupField {
    Neighborhood,
    District,
    Year,
}

impl GroupField {
    pub fn column_name(self) -> &'static str {
        match self {
            GroupField::Neighborhood => "ortsteil",
            GroupField::District => "district",
            GroupField::Year => "year",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupValue {
    Text(String),
    Year(i32),
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Text(text) => f.write_str(text),
            GroupValue::Year(year) => write!(f, "{}", year),
        }
    }
}

/// Ordered tuple of group values, one per requested [`GroupField`].
pub type GroupKey = Vec<GroupValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStat {
    pub mean_price: f64,
    pub median_price: f64,
    pub count: usize,
    pub mean_price_per_area: Option<f64>,
}
