//! Side-by-side profile of two CSV datasets, focused on the geographic columns.

use crate::utils::error::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

pub const GEO_COLUMNS: [&str; 6] = ["lat", "lon", "plz", "ortsteil", "bezirk", "wol"];
pub const SAMPLE_COLUMNS: [&str; 5] = ["plz", "ortsteil", "bezirk", "lat", "lon"];
pub const SAMPLE_ROWS: usize = 5;

const MISSING_MARKERS: [&str; 6] = ["", "nan", "NaN", "NA", "N/A", "null"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnCompleteness {
    pub column: String,
    /// `None` when the column does not exist in the file.
    pub missing: Option<usize>,
    pub missing_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub name: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub geo_columns: Vec<ColumnCompleteness>,
    /// First rows of [`SAMPLE_COLUMNS`], only when all of them are present.
    pub sample: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetComparison {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub left: DatasetProfile,
    pub right: DatasetProfile,
    pub only_in_left: Vec<String>,
    pub only_in_right: Vec<String>,
}

fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value.trim())
}

pub fn profile_reader<R: Read>(reader: R, name: &str) -> Result<DatasetProfile> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let position = |column: &str| columns.iter().position(|c| c == column);

    let geo_positions: Vec<Option<usize>> = GEO_COLUMNS.iter().map(|c| position(*c)).collect();
    let sample_positions: Option<Vec<usize>> = SAMPLE_COLUMNS.iter().map(|c| position(*c)).collect();

    let mut rows = 0;
    let mut missing = vec![0usize; GEO_COLUMNS.len()];
    let mut sample = Vec::new();

    for record in rdr.records() {
        let record = record?;
        rows += 1;

        for (count, index) in missing.iter_mut().zip(&geo_positions) {
            if let Some(index) = index {
                if record.get(*index).map_or(true, is_missing) {
                    *count += 1;
                }
            }
        }

        if let Some(positions) = &sample_positions {
            if sample.len() < SAMPLE_ROWS {
                sample.push(
                    positions
                        .iter()
                        .map(|&i| record.get(i).unwrap_or_default().to_string())
                        .collect(),
                );
            }
        }
    }

    let geo_columns = GEO_COLUMNS
        .iter()
        .zip(geo_positions)
        .zip(missing)
        .map(|((column, index), count)| {
            let present = index.is_some();
            ColumnCompleteness {
                column: column.to_string(),
                missing: present.then_some(count),
                missing_percent: present.then(|| {
                    if rows == 0 {
                        0.0
                    } else {
                        100.0 * count as f64 / rows as f64
                    }
                }),
            }
        })
        .collect();

    Ok(DatasetProfile {
        name: name.to_string(),
        rows,
        columns,
        geo_columns,
        sample: sample_positions.map(|_| sample),
    })
}

pub fn profile_file(path: &Path) -> Result<DatasetProfile> {
    let file = std::fs::File::open(path)?;
    profile_reader(file, &path.display().to_string())
}

pub fn compare(left: DatasetProfile, right: DatasetProfile) -> DatasetComparison {
    let only_in = |a: &DatasetProfile, b: &DatasetProfile| -> Vec<String> {
        a.columns
            .iter()
            .filter(|c| !b.columns.contains(c))
            .cloned()
            .collect()
    };

    DatasetComparison {
        generated_at: chrono::Utc::now(),
        only_in_left: only_in(&left, &right),
        only_in_right: only_in(&right, &left),
        left,
        right,
    }
}

pub fn compare_files(left: &Path, right: &Path) -> Result<DatasetComparison> {
    Ok(compare(profile_file(left)?, profile_file(right)?))
}

fn render_profile(out: &mut String, profile: &DatasetProfile) {
    let _ = writeln!(out, "{}:", profile.name);
    let _ = writeln!(out, "Shape: ({}, {})", profile.rows, profile.columns.len());
    let _ = writeln!(out, "Columns: {:?}", profile.columns);
}

fn render_completeness(out: &mut String, profile: &DatasetProfile) {
    let _ = writeln!(out, "{}:", profile.name);
    for column in &profile.geo_columns {
        match (column.missing, column.missing_percent) {
            (Some(count), Some(percent)) => {
                let _ = writeln!(out, "{}: {} missing values ({:.1}%)", column.column, count, percent);
            }
            _ => {
                let _ = writeln!(out, "{}: Column missing", column.column);
            }
        }
    }
}

fn render_sample(out: &mut String, profile: &DatasetProfile) {
    let _ = writeln!(out, "{} (first {} rows):", profile.name, SAMPLE_ROWS);
    match &profile.sample {
        Some(rows) => {
            let _ = writeln!(out, "{}", SAMPLE_COLUMNS.join("\t"));
            for row in rows {
                let _ = writeln!(out, "{}", row.join("\t"));
            }
        }
        None => {
            let _ = writeln!(out, "Geographic columns not all present");
        }
    }
}

/// Plain text report for the terminal.
pub fn render_text(comparison: &DatasetComparison) -> String {
    let mut out = String::new();

    render_profile(&mut out, &comparison.left);
    out.push('\n');
    render_profile(&mut out, &comparison.right);

    let _ = writeln!(out, "\n--- Geographic columns check ---");
    render_completeness(&mut out, &comparison.left);
    out.push('\n');
    render_completeness(&mut out, &comparison.right);

    let _ = writeln!(out, "\n--- Sample geographic data ---");
    render_sample(&mut out, &comparison.left);
    out.push('\n');
    render_sample(&mut out, &comparison.right);

    let _ = writeln!(out, "\n--- Column differences ---");
    let _ = writeln!(out, "Only in {}: {:?}", comparison.left.name, comparison.only_in_left);
    let _ = writeln!(out, "Only in {}: {:?}", comparison.right.name, comparison.only_in_right);

    out
}
