//! Read-only filters over a loaded feedback collection.

use std::collections::HashSet;

use crate::models::{FeedbackItem, FeedbackType};

pub fn feedback_for_product<'a>(items: &'a [FeedbackItem], product: &str) -> Vec<&'a FeedbackItem> {
    items.iter().filter(|item| item.product == product).collect()
}

pub fn technical_issues<'a>(items: &'a [FeedbackItem], product: &str) -> Vec<&'a FeedbackItem> {
    by_kind(items, product, FeedbackType::Technical)
}

pub fn feedback_only<'a>(items: &'a [FeedbackItem], product: &str) -> Vec<&'a FeedbackItem> {
    by_kind(items, product, FeedbackType::Feedback)
}

pub fn by_kind<'a>(
    items: &'a [FeedbackItem],
    product: &str,
    kind: FeedbackType,
) -> Vec<&'a FeedbackItem> {
    items
        .iter()
        .filter(|item| item.product == product && item.kind == kind)
        .collect()
}

/// Distinct product names in order of first appearance.
pub fn products(items: &[FeedbackItem]) -> Vec<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| item.product.as_str())
        .filter(|product| seen.insert(*product))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, product: &str, kind: FeedbackType) -> FeedbackItem {
        FeedbackItem {
            id,
            product: product.to_string(),
            kind,
            transcript: format!("record {id}"),
            phone: None,
            location: None,
            timestamp: None,
        }
    }

    fn sample() -> Vec<FeedbackItem> {
        vec![
            item(1, "Magenta Max", FeedbackType::Feedback),
            item(2, "Mobile Hotspot", FeedbackType::Technical),
            item(3, "Magenta Max", FeedbackType::Technical),
            item(4, "Magenta Max", FeedbackType::Feedback),
            item(5, "Mobile Hotspot", FeedbackType::Feedback),
        ]
    }

    fn ids(found: &[&FeedbackItem]) -> Vec<i64> {
        found.iter().map(|item| item.id).collect()
    }

    #[test]
    fn filters_by_product_in_original_order() {
        let items = sample();
        assert_eq!(ids(&feedback_for_product(&items, "Magenta Max")), vec![1, 3, 4]);
        assert!(feedback_for_product(&items, "Prepaid Plans").is_empty());
    }

    #[test]
    fn splits_by_type() {
        let items = sample();
        assert_eq!(ids(&technical_issues(&items, "Magenta Max")), vec![3]);
        assert_eq!(ids(&feedback_only(&items, "Magenta Max")), vec![1, 4]);
        assert_eq!(ids(&feedback_only(&items, "Mobile Hotspot")), vec![5]);
    }

    #[test]
    fn product_names_are_exact_match() {
        let items = sample();
        assert!(feedback_for_product(&items, "magenta max").is_empty());
    }

    #[test]
    fn lists_distinct_products_first_seen() {
        let items = sample();
        assert_eq!(products(&items), vec!["Magenta Max", "Mobile Hotspot"]);
    }
}
