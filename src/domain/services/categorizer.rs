use crate::domain::model::{CategorizedListing, ListingRecord, QuantileBoundaries};
use crate::domain::ports::RecordCount;
use crate::utils::stats;

#[derive(Debug, Clone, Default)]
pub struct Categorization {
    pub listings: Vec<CategorizedListing>,
    /// `None` when no listing carried a price.
    pub boundaries: Option<QuantileBoundaries>,
}

impl RecordCount for Categorization {
    fn record_count(&self) -> usize {
        self.listings.len()
    }
}

/// `price / size`, or `None` when size is missing or zero or the quotient is not finite.
pub fn price_per_area(price: f64, size: Option<f64>) -> Option<f64> {
    let size = size?;
    if size == 0.0 {
        return None;
    }
    let value = price / size;
    value.is_finite().then_some(value)
}

pub fn quantile_boundaries(prices: &[f64]) -> Option<QuantileBoundaries> {
    let mut sorted: Vec<f64> = prices.iter().copied().filter(|p| p.is_finite()).collect();
    stats::sort_values(&mut sorted);

    Some(QuantileBoundaries {
        q25: stats::percentile(&sorted, 0.25)?,
        q50: stats::percentile(&sorted, 0.50)?,
        q75: stats::percentile(&sorted, 0.75)?,
    })
}

/// Buckets every priced listing into one of four quartile tiers.
pub fn categorize(listings: Vec<ListingRecord>) -> Categorization {
    let prices: Vec<f64> = listings
        .iter()
        .filter_map(|listing| listing.price)
        .filter(|price| price.is_finite())
        .collect();

    let Some(boundaries) = quantile_boundaries(&prices) else {
        return Categorization::default();
    };

    tracing::info!(
        "💶 Price quantiles: 25%={:.0}€, 50%={:.0}€, 75%={:.0}€",
        boundaries.q25,
        boundaries.q50,
        boundaries.q75
    );

    let listings = listings
        .into_iter()
        .filter_map(|listing| {
            let price = listing.price.filter(|p| p.is_finite())?;
            Some(CategorizedListing {
                tier: boundaries.tier_for(price),
                price_per_area: price_per_area(price, listing.size),
                price,
                listing,
            })
        })
        .collect();

    Categorization {
        listings,
        boundaries: Some(boundaries),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PriceTier;

    fn listing(price: f64) -> ListingRecord {
        ListingRecord::new(price, 50.0, "Mitte", 2020)
    }

    #[test]
    fn test_four_price_example() {
        let result = categorize(vec![listing(100.0), listing(200.0), listing(300.0), listing(400.0)]);

        let boundaries = result.boundaries.unwrap();
        assert_eq!(boundaries.q25, 175.0);
        assert_eq!(boundaries.q50, 250.0);
        assert_eq!(boundaries.q75, 325.0);

        let tiers: Vec<u8> = result.listings.iter().map(|l| l.tier.rank()).collect();
        assert_eq!(tiers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_boundaries_are_inclusive_on_lower_tier() {
        let boundaries = QuantileBoundaries {
            q25: 10.0,
            q50: 20.0,
            q75: 30.0,
        };
        assert_eq!(boundaries.tier_for(10.0), PriceTier::Budget);
        assert_eq!(boundaries.tier_for(10.01), PriceTier::BudgetMid);
        assert_eq!(boundaries.tier_for(20.0), PriceTier::BudgetMid);
        assert_eq!(boundaries.tier_for(30.0), PriceTier::MidUpper);
        assert_eq!(boundaries.tier_for(30.5), PriceTier::Premium);
    }

    #[test]
    fn test_uniform_sample_splits_into_quarters() {
        let listings: Vec<_> = (1..=1000).map(|p| listing(p as f64)).collect();
        let result = categorize(listings);

        let mut counts = [0usize; 4];
        for categorized in &result.listings {
            counts[(categorized.tier.rank() - 1) as usize] += 1;
        }

        assert_eq!(counts.iter().sum::<usize>(), 1000);
        for count in counts {
            assert!((240..=260).contains(&count), "tier count {} off quarter", count);
        }
    }

    #[test]
    fn test_price_per_area_undefined_for_zero_or_missing_size() {
        assert_eq!(price_per_area(1000.0, Some(0.0)), None);
        assert_eq!(price_per_area(1000.0, None), None);
        assert_eq!(price_per_area(1000.0, Some(f64::INFINITY)), Some(0.0));
        assert_eq!(price_per_area(f64::INFINITY, Some(2.0)), None);
        assert_eq!(price_per_area(1000.0, Some(50.0)), Some(20.0));

        let mut zero_size = listing(500.0);
        zero_size.size = Some(0.0);
        let result = categorize(vec![zero_size, listing(700.0)]);
        assert_eq!(result.listings[0].price_per_area, None);
        assert_eq!(result.listings[1].price_per_area, Some(14.0));
    }

    #[test]
    fn test_missing_prices_are_skipped() {
        let mut unpriced = listing(0.0);
        unpriced.price = None;

        let result = categorize(vec![unpriced, listing(300.0)]);
        assert_eq!(result.listings.len(), 1);
        assert_eq!(result.boundaries.unwrap().q50, 300.0);
    }

    #[test]
    fn test_empty_input_has_no_boundaries() {
        let result = categorize(Vec::new());
        assert!(result.boundaries.is_none());
        assert!(result.listings.is_empty());
    }
}
