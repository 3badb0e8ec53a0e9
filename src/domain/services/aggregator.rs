use crate::domain::model::{AggregateStat, CategorizedListing, GroupField, GroupKey, GroupValue};
use crate::utils::stats;
use std::collections::BTreeMap;

fn group_value(listing: &CategorizedListing, field: GroupField) -> Option<GroupValue> {
    let record = &listing.listing;
    match field {
        GroupField::Neighborhood => record.neighborhood.clone().map(GroupValue::Text),
        GroupField::District => record.district.clone().map(GroupValue::Text),
        GroupField::Year => record.year.map(GroupValue::Year),
    }
}

#[derive(Default)]
struct Bucket {
    prices: Vec<f64>,
    prices_per_area: Vec<f64>,
}

impl Bucket {
    fn finish(mut self) -> Option<AggregateStat> {
        // 先排序再加總，結果與輸入順序無關
        stats::sort_values(&mut self.prices);
        stats::sort_values(&mut self.prices_per_area);

        Some(AggregateStat {
            mean_price: stats::round2(stats::mean(&self.prices)?),
            median_price: stats::round2(stats::median(&self.prices)?),
            count: self.prices.len(),
            mean_price_per_area: stats::mean(&self.prices_per_area).map(stats::round2),
        })
    }
}

/// Groups listings by `fields` (in the given order) and summarises price per group.
///
/// Listings without a value for one of the fields do not take part. Empty
/// groups never appear in the result.
pub fn aggregate(
    listings: &[CategorizedListing],
    fields: &[GroupField],
) -> BTreeMap<GroupKey, AggregateStat> {
    let mut buckets: BTreeMap<GroupKey, Bucket> = BTreeMap::new();

    for listing in listings {
        let Some(key) = fields
            .iter()
            .map(|field| group_value(listing, *field))
            .collect::<Option<GroupKey>>()
        else {
            continue;
        };

        let bucket = buckets.entry(key).or_default();
        bucket.prices.push(listing.price);
        if let Some(value) = listing.price_per_area {
            bucket.prices_per_area.push(value);
        }
    }

    buckets
        .into_iter()
        .filter_map(|(key, bucket)| bucket.finish().map(|stat| (key, stat)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ListingRecord, QuantileBoundaries};
    use crate::domain::services::categorizer::price_per_area;

    fn categorized(price: f64, size: f64, district: &str, neighborhood: Option<&str>, year: i32) -> CategorizedListing {
        let mut listing = ListingRecord::new(price, size, district, year);
        if let Some(name) = neighborhood {
            listing = listing.with_neighborhood(name);
        }
        let boundaries = QuantileBoundaries {
            q25: 500.0,
            q50: 1000.0,
            q75: 1500.0,
        };
        CategorizedListing {
            tier: boundaries.tier_for(price),
            price_per_area: price_per_area(price, Some(size)),
            price,
            listing,
        }
    }

    fn text(value: &str) -> GroupValue {
        GroupValue::Text(value.to_string())
    }

    fn fixture() -> Vec<CategorizedListing> {
        vec![
            categorized(1000.0, 50.0, "Mitte", Some("Wedding"), 2020),
            categorized(1200.0, 40.0, "Mitte", Some("Wedding"), 2021),
            categorized(900.0, 0.0, "Mitte", Some("Moabit"), 2020),
            categorized(2000.0, 80.0, "Pankow", None, 2021),
            categorized(1333.333, 30.0, "Pankow", Some("Buch"), 2021),
        ]
    }

    #[test]
    fn test_aggregate_by_neighborhood() {
        let result = aggregate(&fixture(), &[GroupField::Neighborhood]);

        // 沒有 Ortsteil 的資料不參與分組
        assert_eq!(result.len(), 3);

        let wedding = &result[&vec![text("Wedding")]];
        assert_eq!(wedding.count, 2);
        assert_eq!(wedding.mean_price, 1100.0);
        assert_eq!(wedding.median_price, 1100.0);
        assert_eq!(wedding.mean_price_per_area, Some(25.0));

        let moabit = &result[&vec![text("Moabit")]];
        assert_eq!(moabit.mean_price_per_area, None);

        let buch = &result[&vec![text("Buch")]];
        assert_eq!(buch.mean_price, 1333.33);
        assert_eq!(buch.mean_price_per_area, Some(44.44));
    }

    #[test]
    fn test_aggregate_by_district_and_year() {
        let result = aggregate(&fixture(), &[GroupField::District, GroupField::Year]);

        let keys: Vec<String> = result
            .keys()
            .map(|key| key.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("/"))
            .collect();
        assert_eq!(keys, vec!["Mitte/2020", "Mitte/2021", "Pankow/2021"]);

        let mitte_2020 = &result[&vec![text("Mitte"), GroupValue::Year(2020)]];
        assert_eq!(mitte_2020.count, 2);
        assert_eq!(mitte_2020.median_price, 950.0);
        assert_eq!(mitte_2020.mean_price_per_area, Some(20.0));
    }

    #[test]
    fn test_aggregate_ignores_input_order() {
        let forward = aggregate(&fixture(), &[GroupField::District]);
        let mut reversed_input = fixture();
        reversed_input.reverse();
        let reversed = aggregate(&reversed_input, &[GroupField::District]);

        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_aggregate_empty_input() {
        assert!(aggregate(&[], &[GroupField::Year]).is_empty());
    }

    #[test]
    fn test_aggregate_without_fields_is_one_group() {
        let result = aggregate(&fixture(), &[]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[&Vec::new()].count, 5);
    }
}
