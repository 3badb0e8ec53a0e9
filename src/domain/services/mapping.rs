use crate::domain::model::{DetailedMappingRow, PostalMappingEntry, PostalRecord, SimplifiedMappingRow};
use crate::domain::ports::{RecordCount, Storage};
use crate::domain::services::resolver::{NeighborhoodResolver, Resolution, ResolvedPostalCode};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::BTreeSet;

/// A CSV row type with a fixed header, written even when there are no rows.
pub trait MappingRow: Serialize {
    const HEADER: &'static [&'static str];
}

impl MappingRow for DetailedMappingRow {
    const HEADER: &'static [&'static str] = &[
        "PLZ",
        "Ortsteil",
        "Bezirk",
        "Entries",
        "Ortsteile_Count",
        "Lat",
        "Lon",
    ];
}

impl MappingRow for SimplifiedMappingRow {
    const HEADER: &'static [&'static str] = &["PLZ", "Ortsteil", "Bezirk", "Lat", "Lon"];
}

#[derive(Debug, Clone, Default)]
pub struct MappingOutput {
    /// Sorted ascending by postal code.
    pub detailed: Vec<DetailedMappingRow>,
    pub simplified: Vec<SimplifiedMappingRow>,
    pub summary: MappingSummary,
}

impl RecordCount for MappingOutput {
    fn record_count(&self) -> usize {
        self.detailed.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingSummary {
    pub records_read: usize,
    pub records_discarded: usize,
    pub entries: usize,
    pub entries_with_coordinates: usize,
    pub ambiguous_postal_codes: usize,
    pub unresolved_neighborhoods: Vec<String>,
}

impl MappingSummary {
    pub fn coverage_percent(&self) -> f64 {
        if self.entries == 0 {
            0.0
        } else {
            100.0 * self.entries_with_coordinates as f64 / self.entries as f64
        }
    }
}

pub struct MappingBuilder {
    resolver: NeighborhoodResolver,
}

impl MappingBuilder {
    pub fn new(resolver: NeighborhoodResolver) -> Self {
        Self { resolver }
    }

    pub fn build(&self, records: &[PostalRecord]) -> MappingOutput {
        let resolution = self.resolver.resolve_with_diagnostics(records);
        log_ambiguities(&resolution);

        let mut unresolved = BTreeSet::new();
        let mut ambiguous_postal_codes = 0;
        for resolved in resolution.postal_codes.values() {
            if resolved.entry.centroid.is_none() {
                unresolved.insert(resolved.entry.neighborhood.clone());
            }
            if resolved.entry.neighborhood_count > 1 {
                ambiguous_postal_codes += 1;
            }
        }

        let records_read = resolution.records_read;
        let records_discarded = resolution.records_discarded;
        // BTreeMap 保證依 PLZ 遞增
        let entries: Vec<PostalMappingEntry> = resolution.into_entries().into_values().collect();

        let summary = MappingSummary {
            records_read,
            records_discarded,
            entries: entries.len(),
            entries_with_coordinates: entries.iter().filter(|e| e.centroid.is_some()).count(),
            ambiguous_postal_codes,
            unresolved_neighborhoods: unresolved.into_iter().collect(),
        };
        log_summary(&summary);

        MappingOutput {
            detailed: entries.iter().map(DetailedMappingRow::from).collect(),
            simplified: entries.iter().map(SimplifiedMappingRow::from).collect(),
            summary,
        }
    }

    /// Writes header plus rows to `path`, replacing whatever was there.
    pub fn persist<S: Storage, R: MappingRow>(storage: &S, rows: &[R], path: &str) -> Result<()> {
        let data = encode_rows(rows)?;
        storage.write_file(path, &data)?;
        tracing::debug!("Wrote {} rows to {}", rows.len(), path);
        Ok(())
    }
}

impl Default for MappingBuilder {
    fn default() -> Self {
        Self::new(NeighborhoodResolver::default())
    }
}

pub fn encode_rows<R: MappingRow>(rows: &[R]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(R::HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| crate::utils::error::EtlError::IoError(e.into_error()))
}

/// Audit line for a postal code spanning several Ortsteile; `None` when there is only one.
pub fn ambiguity_line(code: &str, resolved: &ResolvedPostalCode) -> Option<String> {
    if resolved.frequencies.distinct() <= 1 {
        return None;
    }
    let table = resolved
        .frequencies
        .entries()
        .iter()
        .map(|(name, count)| format!("{}: {}", name, count))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "PLZ {} has {} Ortsteile: {{{}}} → using most frequent: {}",
        code,
        resolved.frequencies.distinct(),
        table,
        resolved.entry.neighborhood
    ))
}

fn log_ambiguities(resolution: &Resolution) {
    for (code, resolved) in &resolution.postal_codes {
        if let Some(line) = ambiguity_line(code, resolved) {
            tracing::info!("{}", line);
        }
        if resolved.distinct_districts > 1 {
            tracing::warn!(
                "⚠️ PLZ {} spans {} districts, keeping first seen: {}",
                code,
                resolved.distinct_districts,
                resolved.entry.district.as_deref().unwrap_or("<none>")
            );
        }
    }
}

fn log_summary(summary: &MappingSummary) {
    tracing::info!(
        "📊 Resolved {} PLZ from {} records ({} discarded)",
        summary.entries,
        summary.records_read,
        summary.records_discarded
    );
    tracing::info!(
        "📍 Entries with coordinates: {} / {} ({:.1}%)",
        summary.entries_with_coordinates,
        summary.entries,
        summary.coverage_percent()
    );
    if !summary.unresolved_neighborhoods.is_empty() {
        tracing::warn!(
            "⚠️ Missing coordinates for {} unique Ortsteile: {}",
            summary.unresolved_neighborhoods.len(),
            summary.unresolved_neighborhoods.join(", ")
        );
    }
}
