//! Summary of a freshly built PLZ mapping against an older district-only one.

use crate::adapters::csv_source;
use crate::domain::model::{PreviousMappingRow, SimplifiedMappingRow};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::Path;

pub const EXAMPLE_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingExample {
    pub postal_code: String,
    pub previous_district: Option<String>,
    pub neighborhood: String,
    pub district: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingComparison {
    pub previous_count: usize,
    pub current_count: usize,
    pub common_count: usize,
    pub with_coordinates: usize,
    /// Lowest common postal codes, at most [`EXAMPLE_ROWS`].
    pub examples: Vec<MappingExample>,
}

impl MappingComparison {
    pub fn coordinate_percent(&self) -> f64 {
        if self.current_count == 0 {
            0.0
        } else {
            100.0 * self.with_coordinates as f64 / self.current_count as f64
        }
    }
}

pub fn compare_mappings(
    previous: &[PreviousMappingRow],
    current: &[SimplifiedMappingRow],
) -> MappingComparison {
    // 重複的 PLZ 取第一筆
    let mut previous_by_code: BTreeMap<&str, &PreviousMappingRow> = BTreeMap::new();
    for row in previous {
        previous_by_code.entry(row.postal_code.as_str()).or_insert(row);
    }
    let mut current_by_code: BTreeMap<&str, &SimplifiedMappingRow> = BTreeMap::new();
    for row in current {
        current_by_code.entry(row.postal_code.as_str()).or_insert(row);
    }

    let common: BTreeSet<&str> = previous_by_code
        .keys()
        .filter(|code| current_by_code.contains_key(*code))
        .copied()
        .collect();

    let examples = common
        .iter()
        .take(EXAMPLE_ROWS)
        .filter_map(|code| {
            let old = previous_by_code.get(code)?;
            let new = current_by_code.get(code)?;
            Some(MappingExample {
                postal_code: code.to_string(),
                previous_district: old.district.clone(),
                neighborhood: new.neighborhood.clone(),
                district: new.district.clone(),
                lat: new.lat,
                lon: new.lon,
            })
        })
        .collect();

    MappingComparison {
        previous_count: previous.len(),
        current_count: current.len(),
        common_count: common.len(),
        with_coordinates: current.iter().filter(|row| row.centroid().is_some()).count(),
        examples,
    }
}

pub fn compare_mapping_files(previous: &Path, current: &Path) -> Result<MappingComparison> {
    let previous_rows = csv_source::read_previous_mapping(previous)?;
    let current_rows = csv_source::read_simplified_mapping(current)?;
    Ok(compare_mappings(&previous_rows, &current_rows))
}

pub fn render_text(comparison: &MappingComparison) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Comparison with previous mapping ===");
    let _ = writeln!(out, "Previous mapping: {} PLZ → Bezirk entries", comparison.previous_count);
    let _ = writeln!(
        out,
        "New mapping: {} PLZ → Ortsteil + coordinates entries",
        comparison.current_count
    );
    let _ = writeln!(out, "Common PLZ: {}", comparison.common_count);
    let _ = writeln!(
        out,
        "Coordinates available: {} / {} ({:.1}%)",
        comparison.with_coordinates,
        comparison.current_count,
        comparison.coordinate_percent()
    );

    if !comparison.examples.is_empty() {
        let _ = writeln!(out, "\nExamples of enhanced granularity:");
    }
    for example in &comparison.examples {
        let coords = match (example.lat, example.lon) {
            (Some(lat), Some(lon)) => format!("({:.4}, {:.4})", lat, lon),
            _ => "(no coords)".to_string(),
        };
        let _ = writeln!(
            out,
            "PLZ {}: {} → {} ({}) {}",
            example.postal_code,
            example.previous_district.as_deref().unwrap_or("-"),
            example.neighborhood,
            example.district.as_deref().unwrap_or("-"),
            coords
        );
    }

    out
}
