use std::collections::HashMap;

use crate::baseline::{BaselineProvider, StaticBaselines};
use crate::error::EngineError;
use crate::models::{FeedbackItem, FeedbackType, ProductHappiness, Sentiment};
use crate::sentiment::{KeywordClassifier, SentimentClassifier};

/// Score points removed per technical issue, relative to one positive feedback.
pub const TECHNICAL_PENALTY_WEIGHT: f64 = 0.5;

pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 100;

/// Product id reported for products absent from the id table.
pub const UNMAPPED_PRODUCT_ID: i64 = 0;

pub fn compute_happiness(items: &[FeedbackItem]) -> Vec<ProductHappiness> {
    compute_happiness_with(items, &KeywordClassifier, &StaticBaselines::default())
}

/// Groups `items` by product and scores each group, worst score first.
pub fn compute_happiness_with(
    items: &[FeedbackItem],
    classifier: &dyn SentimentClassifier,
    baselines: &dyn BaselineProvider,
) -> Vec<ProductHappiness> {
    let mut groups: HashMap<&str, Vec<&FeedbackItem>> = HashMap::new();
    for item in items {
        groups.entry(item.product.as_str()).or_default().push(item);
    }

    let mut results: Vec<ProductHappiness> = groups
        .into_iter()
        .map(|(product, group)| score_group(product, &group, classifier, baselines))
        .collect();

    sort_worst_first(&mut results);
    tracing::debug!(
        records = items.len(),
        products = results.len(),
        "computed product happiness"
    );
    results
}

/// Scores a single, externally assembled product group.
///
/// Every item must belong to `product` and the group must not be empty.
pub fn score_product(
    product: &str,
    items: &[FeedbackItem],
    classifier: &dyn SentimentClassifier,
    baselines: &dyn BaselineProvider,
) -> Result<ProductHappiness, EngineError> {
    if items.is_empty() {
        return Err(EngineError::EmptyGroup(product.to_string()));
    }
    if let Some(stray) = items.iter().find(|item| item.product != product) {
        return Err(EngineError::ProductMismatch {
            id: stray.id,
            expected: product.to_string(),
            found: stray.product.clone(),
        });
    }

    let group: Vec<&FeedbackItem> = items.iter().collect();
    Ok(score_group(product, &group, classifier, baselines))
}

fn score_group(
    product: &str,
    group: &[&FeedbackItem],
    classifier: &dyn SentimentClassifier,
    baselines: &dyn BaselineProvider,
) -> ProductHappiness {
    let total = group.len();
    let technical = group
        .iter()
        .filter(|item| item.kind == FeedbackType::Technical)
        .count();
    let feedback = total - technical;
    let positive = group
        .iter()
        .filter(|item| {
            item.kind == FeedbackType::Feedback
                && classifier.classify(&item.transcript) == Sentiment::Positive
        })
        .count();

    let score = happiness_score(positive, technical, total);
    let baseline = match baselines.yesterday_score(product) {
        Some(value) => value,
        None => {
            tracing::debug!(product, "no baseline on record, reporting zero change");
            score
        }
    };

    ProductHappiness {
        product: product.to_string(),
        product_id: baselines.product_id(product).unwrap_or(UNMAPPED_PRODUCT_ID),
        happiness_score: score,
        total_feedback: total,
        technical_issues: technical,
        feedback_items: feedback,
        positive_count: positive,
        daily_change: score - baseline,
    }
}

/// `round((positive - technical * weight) / total * 100)`, clamped to `MIN_SCORE..=MAX_SCORE`.
///
/// `total` must be non-zero.
pub fn happiness_score(positive: usize, technical: usize, total: usize) -> i64 {
    let raw = (positive as f64 - technical as f64 * TECHNICAL_PENALTY_WEIGHT) / total as f64 * 100.0;
    // Halves round up; anything negative is clamped away below.
    let rounded = (raw + 0.5).floor() as i64;
    rounded.clamp(MIN_SCORE, MAX_SCORE)
}

pub fn sort_worst_first(results: &mut [ProductHappiness]) {
    results.sort_by(|a, b| {
        a.happiness_score
            .cmp(&b.happiness_score)
            .then_with(|| a.product.cmp(&b.product))
    });
}
