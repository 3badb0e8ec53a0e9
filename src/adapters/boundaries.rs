use crate::domain::services::layers::BoundaryRegion;
use crate::utils::error::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const REGION_NAME_PROPERTY: &str = "spatial_alias";
pub const REGION_DISTRICT_PROPERTY: &str = "BEZIRK";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<HashMap<String, serde_json::Value>>,
}

/// Reads region names from a GeoJSON FeatureCollection. Geometry is ignored.
pub fn parse_regions(data: &[u8]) -> Result<Vec<BoundaryRegion>> {
    let collection: FeatureCollection = serde_json::from_slice(data)?;

    let mut regions = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let properties = feature.properties.unwrap_or_default();
        let Some(name) = properties
            .get(REGION_NAME_PROPERTY)
            .and_then(|v| v.as_str())
        else {
            tracing::warn!(
                "⚠️ Boundary feature #{} has no '{}' property, skipped",
                index,
                REGION_NAME_PROPERTY
            );
            continue;
        };
        let district = properties
            .get(REGION_DISTRICT_PROPERTY)
            .and_then(|v| v.as_str())
            .map(str::to_string);

        regions.push(BoundaryRegion {
            name: name.to_string(),
            district,
        });
    }

    Ok(regions)
}

pub fn read_regions(path: &Path) -> Result<Vec<BoundaryRegion>> {
    let data = std::fs::read(path)?;
    let regions = parse_regions(&data)?;
    tracing::debug!("Loaded {} boundary regions from {}", regions.len(), path.display());
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;

    #[test]
    fn test_parse_regions() {
        let geojson = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"spatial_alias": "Wedding", "BEZIRK": "Mitte"},
                    "geometry": {"type": "Point", "coordinates": [13.36, 52.55]}
                },
                {
                    "type": "Feature",
                    "properties": {"spatial_alias": "Gatow"},
                    "geometry": null
                }
            ]
        });

        let regions = parse_regions(geojson.to_string().as_bytes()).unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "Wedding");
        assert_eq!(regions[0].district.as_deref(), Some("Mitte"));
        assert_eq!(regions[1].district, None);
    }

    #[test]
    fn test_feature_without_name_is_skipped() {
        let geojson = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"spatial_alias": "Mitte"}},
                {"type": "Feature", "properties": {"BEZIRK": "Pankow"}},
                {"type": "Feature", "properties": null}
            ]
        });

        let regions = parse_regions(geojson.to_string().as_bytes()).unwrap();

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Mitte");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            parse_regions(b"not json"),
            Err(EtlError::SerializationError(_))
        ));
    }
}
