//! Reference tables joined onto computed scores.
//!
//! The yesterday scores stand in for a real history store; the product ids
//! join against the external quarterly CHI source.

use std::collections::HashMap;

pub trait BaselineProvider {
    /// Prior-period score for `product`, if one is on record.
    fn yesterday_score(&self, product: &str) -> Option<i64>;

    /// External CHI product id for `product`, if mapped.
    fn product_id(&self, product: &str) -> Option<i64>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticBaselines {
    yesterday: HashMap<String, i64>,
    product_ids: HashMap<String, i64>,
}

impl StaticBaselines {
    pub fn new(yesterday: HashMap<String, i64>, product_ids: HashMap<String, i64>) -> Self {
        Self {
            yesterday,
            product_ids,
        }
    }

    pub fn empty() -> Self {
        Self::new(HashMap::new(), HashMap::new())
    }

    pub fn yesterday_table(&self) -> &HashMap<String, i64> {
        &self.yesterday
    }

    pub fn product_id_table(&self) -> &HashMap<String, i64> {
        &self.product_ids
    }
}

impl Default for StaticBaselines {
    fn default() -> Self {
        Self::new(default_yesterday_scores(), default_product_ids())
    }
}

impl BaselineProvider for StaticBaselines {
    fn yesterday_score(&self, product: &str) -> Option<i64> {
        self.yesterday.get(product).copied()
    }

    fn product_id(&self, product: &str) -> Option<i64> {
        self.product_ids.get(product).copied()
    }
}

pub fn default_yesterday_scores() -> HashMap<String, i64> {
    [
        ("5G Home Internet", 35),
        ("Magenta Max", 85),
        ("T-Mobile One", 30),
        ("Business Unlimited", 100),
        ("Prepaid Plans", 45),
        ("Mobile Hotspot", 70),
    ]
    .into_iter()
    .map(|(name, score)| (name.to_string(), score))
    .collect()
}

pub fn default_product_ids() -> HashMap<String, i64> {
    // Ids 1-3 exist in the quarterly CHI source; 4-6 are local only.
    [
        ("Mobile Hotspot", 1),
        ("Magenta Max", 2),
        ("Business Unlimited", 3),
        ("5G Home Internet", 4),
        ("T-Mobile One", 5),
        ("Prepaid Plans", 6),
    ]
    .into_iter()
    .map(|(name, id)| (name.to_string(), id))
    .collect()
}
