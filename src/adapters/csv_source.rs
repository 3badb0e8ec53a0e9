use crate::domain::model::{ListingRecord, PostalRecord, PreviousMappingRow, SimplifiedMappingRow};
use crate::utils::error::{EtlError, Result};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

pub const POSTAL_RECORD_COLUMNS: &[&str] = &["plz", "ortsteil_neu", "bezirk_neu"];
pub const LISTING_COLUMNS: &[&str] = &["price", "size", "district", "year"];
pub const SIMPLIFIED_MAPPING_COLUMNS: &[&str] = &["PLZ", "Ortsteil", "Bezirk", "Lat", "Lon"];
pub const PREVIOUS_MAPPING_COLUMNS: &[&str] = &["PLZ", "Bezirk"];

/// Fails with the full list of missing and available columns.
pub fn check_required_columns(
    source_name: &str,
    headers: &csv::StringRecord,
    required: &[&str],
) -> Result<()> {
    let available: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let missing: Vec<String> = required
        .iter()
        .filter(|column| !available.iter().any(|h| h == *column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(EtlError::MissingColumnsError {
            source_name: source_name.to_string(),
            missing,
            available,
        })
    }
}

pub fn read_records<T, R>(reader: R, source_name: &str, required: &[&str]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    check_required_columns(source_name, &headers, required)?;

    let mut records = Vec::new();
    for row in rdr.deserialize::<T>() {
        records.push(row?);
    }

    tracing::debug!("Read {} rows from {}", records.len(), source_name);
    Ok(records)
}

fn read_file_records<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>> {
    let file = std::fs::File::open(path)?;
    read_records(file, &path.display().to_string(), required)
}

pub fn read_postal_records(path: &Path) -> Result<Vec<PostalRecord>> {
    read_file_records(path, POSTAL_RECORD_COLUMNS)
}

pub fn read_listings(path: &Path) -> Result<Vec<ListingRecord>> {
    read_file_records(path, LISTING_COLUMNS)
}

pub fn read_simplified_mapping(path: &Path) -> Result<Vec<SimplifiedMappingRow>> {
    read_file_records(path, SIMPLIFIED_MAPPING_COLUMNS)
}

pub fn read_previous_mapping(path: &Path) -> Result<Vec<PreviousMappingRow>> {
    read_file_records(path, PREVIOUS_MAPPING_COLUMNS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postal_codes_stay_text() {
        let data = "id,plz,strasse,ortsteil_neu,bezirk_neu\n1,01067,Hauptstr,Mitte,Mitte\n2,,Nebenstr,Wedding,Mitte\n";

        let records: Vec<PostalRecord> =
            read_records(data.as_bytes(), "wohnlagen.csv", POSTAL_RECORD_COLUMNS).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].postal_code.as_deref(), Some("01067"));
        assert_eq!(records[1].postal_code, None);
        assert_eq!(records[1].neighborhood.as_deref(), Some("Wedding"));
    }

    #[test]
    fn test_missing_columns_are_reported() {
        let data = "plz,bezirk\n10115,Mitte\n";

        let err = read_records::<PostalRecord, _>(data.as_bytes(), "wohnlagen.csv", POSTAL_RECORD_COLUMNS)
            .unwrap_err();

        match err {
            EtlError::MissingColumnsError {
                missing, available, ..
            } => {
                assert_eq!(missing, vec!["ortsteil_neu", "bezirk_neu"]);
                assert_eq!(available, vec!["plz", "bezirk"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_listings_with_optional_columns_absent() {
        let data = "price,size,district,year\n950,60,Pankow,2021\n1200,,Mitte,2020\nabc,40,Mitte,2019\n";

        let listings: Vec<ListingRecord> =
            read_records(data.as_bytes(), "listings.csv", LISTING_COLUMNS).unwrap();

        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].price, Some(950.0));
        assert_eq!(listings[0].neighborhood, None);
        assert_eq!(listings[0].year, Some(2021));
        assert_eq!(listings[1].size, None);
        assert_eq!(listings[2].price, None);
    }

    #[test]
    fn test_listings_with_optional_columns_present() {
        let data = "price,size,district,year,ortsteil,plz,lat,lon,rooms\n\
                    950,60,Pankow,2021,Buch,13125,52.63,13.50,2.5\n";

        let listings: Vec<ListingRecord> =
            read_records(data.as_bytes(), "listings.csv", LISTING_COLUMNS).unwrap();

        let listing = &listings[0];
        assert_eq!(listing.neighborhood.as_deref(), Some("Buch"));
        assert_eq!(listing.postal_code.as_deref(), Some("13125"));
        assert_eq!(listing.lat, Some(52.63));
        assert_eq!(listing.rooms, Some(2.5));
    }

    #[test]
    fn test_previous_mapping_keeps_leading_zeros() {
        let data = "PLZ,Bezirk\n01067,Mitte\n10115,\n";

        let rows: Vec<PreviousMappingRow> =
            read_records(data.as_bytes(), "berlin_plz_mapping.csv", PREVIOUS_MAPPING_COLUMNS).unwrap();

        assert_eq!(rows[0].postal_code, "01067");
        assert_eq!(rows[1].district, None);
    }

    #[test]
    fn test_float_years_are_accepted_when_whole() {
        let data = "price,size,district,year\n950,60,Pankow,2021.0\n950,60,Pankow,2021.5\n950,60,Pankow,\n";

        let listings: Vec<ListingRecord> =
            read_records(data.as_bytes(), "listings.csv", LISTING_COLUMNS).unwrap();

        let years: Vec<Option<i32>> = listings.iter().map(|l| l.year).collect();
        assert_eq!(years, vec![Some(2021), None, None]);
    }
}
