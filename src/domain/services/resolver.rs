use crate::domain::model::{PostalMappingEntry, PostalRecord};
use crate::domain::services::coordinates::CoordinateTable;
use std::collections::{BTreeMap, HashMap};

pub const POSTAL_CODE_LENGTH: usize = 5;

/// Neighborhood frequencies for one postal code, in first-encountered order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrequencyTable {
    counts: Vec<(String, usize)>,
}

impl FrequencyTable {
    fn record(&mut self, neighborhood: &str) {
        match self.counts.iter_mut().find(|(name, _)| name == neighborhood) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((neighborhood.to_string(), 1)),
        }
    }

    /// Highest count wins; on a tie the earliest entry stays.
    pub fn winner(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.counts {
            if best.map_or(true, |(_, count)| entry.1 > *count) {
                best = Some(entry);
            }
        }
        best.map(|(name, _)| name.as_str())
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.counts
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPostalCode {
    pub entry: PostalMappingEntry,
    pub frequencies: FrequencyTable,
    /// Distinct non-empty districts seen for this code. More than one means the
    /// first-record district may be wrong.
    pub distinct_districts: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub postal_codes: BTreeMap<String, ResolvedPostalCode>,
    pub records_read: usize,
    pub records_discarded: usize,
}

impl Resolution {
    pub fn into_entries(self) -> BTreeMap<String, PostalMappingEntry> {
        self.postal_codes
            .into_iter()
            .map(|(code, resolved)| (code, resolved.entry))
            .collect()
    }
}

#[derive(Default)]
struct PostalGroup {
    district: Option<String>,
    districts_seen: Vec<String>,
    frequencies: FrequencyTable,
}

/// Picks one canonical neighborhood, district and centroid per postal code.
#[derive(Debug, Clone)]
pub struct NeighborhoodResolver {
    coordinates: CoordinateTable,
}

impl NeighborhoodResolver {
    pub fn new(coordinates: CoordinateTable) -> Self {
        Self { coordinates }
    }

    pub fn coordinates(&self) -> &CoordinateTable {
        &self.coordinates
    }

    pub fn resolve(&self, records: &[PostalRecord]) -> BTreeMap<String, PostalMappingEntry> {
        self.resolve_with_diagnostics(records).into_entries()
    }

    pub fn resolve_with_diagnostics(&self, records: &[PostalRecord]) -> Resolution {
        let mut groups: HashMap<&str, PostalGroup> = HashMap::new();
        let mut records_discarded = 0;

        for record in records {
            let (Some(code), Some(neighborhood)) =
                (record.postal_code.as_deref(), record.neighborhood.as_deref())
            else {
                records_discarded += 1;
                continue;
            };
            if code.chars().count() != POSTAL_CODE_LENGTH {
                records_discarded += 1;
                continue;
            }

            let group = groups.entry(code).or_insert_with(|| PostalGroup {
                district: record.district.clone(),
                ..PostalGroup::default()
            });
            group.frequencies.record(neighborhood);
            if let Some(district) = record.district.as_deref() {
                if !group.districts_seen.iter().any(|seen| seen == district) {
                    group.districts_seen.push(district.to_string());
                }
            }
        }

        let postal_codes = groups
            .into_iter()
            .filter_map(|(code, group)| {
                let neighborhood = group.frequencies.winner()?.to_string();
                let centroid = self.coordinates.lookup(&neighborhood);
                let entry = PostalMappingEntry {
                    postal_code: code.to_string(),
                    record_count: group.frequencies.total(),
                    neighborhood_count: group.frequencies.distinct(),
                    neighborhood,
                    district: group.district,
                    centroid,
                };
                Some((
                    code.to_string(),
                    ResolvedPostalCode {
                        entry,
                        frequencies: group.frequencies,
                        distinct_districts: group.districts_seen.len(),
                    },
                ))
            })
            .collect();

        Resolution {
            postal_codes,
            records_read: records.len(),
            records_discarded,
        }
    }
}

impl Default for NeighborhoodResolver {
    fn default() -> Self {
        Self::new(CoordinateTable::berlin_neighborhoods())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Centroid;

    fn record(code: &str, neighborhood: &str, district: &str) -> PostalRecord {
        PostalRecord::new(code, neighborhood, district)
    }

    #[test]
    fn test_modal_neighborhood_wins() {
        let resolver = NeighborhoodResolver::default();
        let records = vec![
            record("10115", "Mitte", "Mitte"),
            record("10115", "Wedding", "Mitte"),
            record("10115", "Mitte", "Mitte"),
        ];

        let mapping = resolver.resolve(&records);

        assert_eq!(mapping.len(), 1);
        let entry = &mapping["10115"];
        assert_eq!(entry.neighborhood, "Mitte");
        assert_eq!(entry.district.as_deref(), Some("Mitte"));
        assert_eq!(entry.record_count, 3);
        assert_eq!(entry.neighborhood_count, 2);
        assert_eq!(entry.centroid, Some(Centroid::new(52.5200, 13.4050)));
    }

    #[test]
    fn test_tie_goes_to_first_encountered() {
        let resolver = NeighborhoodResolver::default();
        let records = vec![
            record("12043", "Neukölln", "Neukölln"),
            record("12043", "Britz", "Neukölln"),
            record("12043", "Britz", "Neukölln"),
            record("12043", "Neukölln", "Neukölln"),
        ];
        assert_eq!(resolver.resolve(&records)["12043"].neighborhood, "Neukölln");

        let reversed: Vec<_> = records.into_iter().rev().collect();
        // 反轉後 Neukölln 仍然最先出現
        assert_eq!(resolver.resolve(&reversed)["12043"].neighborhood, "Neukölln");

        let britz_first = vec![
            record("12043", "Britz", "Neukölln"),
            record("12043", "Neukölln", "Neukölln"),
        ];
        assert_eq!(resolver.resolve(&britz_first)["12043"].neighborhood, "Britz");
    }

    #[test]
    fn test_malformed_records_are_discarded() {
        let resolver = NeighborhoodResolver::default();
        let records = vec![
            record("1011", "Mitte", "Mitte"),
            record("101155", "Mitte", "Mitte"),
            PostalRecord {
                postal_code: None,
                neighborhood: Some("Mitte".to_string()),
                district: Some("Mitte".to_string()),
            },
            PostalRecord {
                postal_code: Some("10117".to_string()),
                neighborhood: None,
                district: Some("Mitte".to_string()),
            },
            record("01067", "Tiergarten", "Mitte"),
        ];

        let resolution = resolver.resolve_with_diagnostics(&records);

        assert_eq!(resolution.records_read, 5);
        assert_eq!(resolution.records_discarded, 4);
        assert_eq!(resolution.postal_codes.len(), 1);
        // 保留開頭的 0
        assert!(resolution.postal_codes.contains_key("01067"));
    }

    #[test]
    fn test_first_record_district_is_kept() {
        let resolver = NeighborhoodResolver::default();
        let records = vec![
            record("10785", "Tiergarten", "Mitte"),
            record("10785", "Tiergarten", "Tempelhof-Schöneberg"),
            record("10785", "Schöneberg", "Tempelhof-Schöneberg"),
        ];

        let resolution = resolver.resolve_with_diagnostics(&records);
        let resolved = &resolution.postal_codes["10785"];

        assert_eq!(resolved.entry.district.as_deref(), Some("Mitte"));
        assert_eq!(resolved.distinct_districts, 2);
        assert_eq!(
            resolved.frequencies.entries(),
            &[("Tiergarten".to_string(), 2), ("Schöneberg".to_string(), 1)]
        );
    }

    #[test]
    fn test_unknown_neighborhood_has_no_centroid() {
        let resolver = NeighborhoodResolver::default();
        let mapping = resolver.resolve(&[record("99999", "Nirgendwo", "Irgendwo")]);
        assert_eq!(mapping["99999"].centroid, None);
    }

    #[test]
    fn test_injected_coordinate_table() {
        let table = CoordinateTable::new([("Mitte", Centroid::new(1.5, 2.5))]);
        let resolver = NeighborhoodResolver::new(table);
        let mapping = resolver.resolve(&[record("10115", "mitte", "Mitte")]);
        assert_eq!(mapping["10115"].centroid, Some(Centroid::new(1.5, 2.5)));
    }

    #[test]
    fn test_empty_input_yields_empty_mapping() {
        let resolver = NeighborhoodResolver::default();
        assert!(resolver.resolve(&[]).is_empty());
    }

    #[test]
    fn test_every_clean_code_gets_exactly_one_entry() {
        let resolver = NeighborhoodResolver::default();
        let mut records = Vec::new();
        for (i, code) in ["10115", "10117", "10119", "10178"].iter().enumerate() {
            for _ in 0..=i {
                records.push(record(code, "Mitte", "Mitte"));
            }
            records.push(record(code, "Wedding", "Mitte"));
        }

        let mapping = resolver.resolve(&records);

        assert_eq!(mapping.len(), 4);
        assert_eq!(mapping["10115"].neighborhood, "Mitte"); // 1:1 tie, Mitte first
        assert_eq!(mapping["10178"].record_count, 5);
    }
}
