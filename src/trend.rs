//! Quarterly CHI overlay.
//!
//! When the external CHI source has a full year for a product, its latest
//! quarter replaces the locally computed score and the change becomes
//! quarter-over-quarter instead of day-over-day.

use std::collections::HashMap;

use crate::models::{ProductHappiness, ProductTrend, QuarterlyScore};

/// Quarters needed before the overlay applies.
pub const QUARTERS_REQUIRED: usize = 4;

/// Latest-quarter score minus the previous quarter, or `None` with fewer than four quarters.
pub fn quarterly_change(quarters: &[QuarterlyScore]) -> Option<i64> {
    let (current, previous) = latest_pair(quarters)?;
    Some(current.score - previous.score)
}

fn latest_pair(quarters: &[QuarterlyScore]) -> Option<(&QuarterlyScore, &QuarterlyScore)> {
    if quarters.len() < QUARTERS_REQUIRED {
        return None;
    }
    Some((&quarters[3], &quarters[2]))
}

/// Distinct ids of scored products that the CHI service tracks, ascending.
pub fn tracked_product_ids(products: &[ProductHappiness], tracked: &[i64]) -> Vec<i64> {
    let mut ids: Vec<i64> = products
        .iter()
        .map(|p| p.product_id)
        .filter(|id| tracked.contains(id))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

pub fn apply_quarterly(
    products: &[ProductHappiness],
    quarterly: &HashMap<i64, Vec<QuarterlyScore>>,
) -> Vec<ProductTrend> {
    products
        .iter()
        .map(|product| {
            let quarters = quarterly.get(&product.product_id);
            match quarters.and_then(|q| latest_pair(q)) {
                Some((current, previous)) => ProductTrend {
                    product: product.product.clone(),
                    product_id: product.product_id,
                    happiness_score: current.score,
                    change: current.score - previous.score,
                    quarterly: true,
                    chi_loaded: true,
                },
                None => ProductTrend {
                    product: product.product.clone(),
                    product_id: product.product_id,
                    happiness_score: product.happiness_score,
                    change: product.daily_change,
                    quarterly: false,
                    chi_loaded: quarters.is_some(),
                },
            }
        })
        .collect()
}
