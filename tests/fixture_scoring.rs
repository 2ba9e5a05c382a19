//! End-to-end scoring of the bundled feedback fixture.

use std::collections::{HashMap, HashSet};

use happiness_index::baseline::StaticBaselines;
use happiness_index::loader::bundled_feedback;
use happiness_index::models::QuarterlyScore;
use happiness_index::sentiment::KeywordClassifier;
use happiness_index::{compute_happiness, compute_happiness_with, query, trend};

#[test]
fn every_product_scored_once_worst_first() {
    let items = bundled_feedback().unwrap();
    let scores = compute_happiness(&items);

    let distinct: HashSet<&str> = items.iter().map(|i| i.product.as_str()).collect();
    assert_eq!(scores.len(), distinct.len());

    let names: Vec<&str> = scores.iter().map(|s| s.product.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Mobile Hotspot",
            "5G Home Internet",
            "Home Office Internet",
            "Prepaid Plans",
            "Magenta Max",
            "T-Mobile One",
            "Business Unlimited",
        ]
    );

    for score in &scores {
        assert!((0..=100).contains(&score.happiness_score));
        assert_eq!(
            score.total_feedback,
            score.technical_issues + score.feedback_items
        );
    }
    assert!(scores
        .windows(2)
        .all(|pair| pair[0].happiness_score <= pair[1].happiness_score));
}

#[test]
fn fixture_scores_and_daily_changes() {
    let items = bundled_feedback().unwrap();
    let scores = compute_happiness(&items);
    let by_name: HashMap<&str, (i64, i64, i64)> = scores
        .iter()
        .map(|s| {
            (
                s.product.as_str(),
                (s.product_id, s.happiness_score, s.daily_change),
            )
        })
        .collect();

    assert_eq!(by_name["Mobile Hotspot"], (1, 0, -70));
    assert_eq!(by_name["Magenta Max"], (2, 50, -35));
    assert_eq!(by_name["Business Unlimited"], (3, 75, -25));
    assert_eq!(by_name["5G Home Internet"], (4, 13, -22));
    assert_eq!(by_name["T-Mobile One"], (5, 50, 20));
    assert_eq!(by_name["Prepaid Plans"], (6, 33, -12));
    assert_eq!(by_name["Home Office Internet"], (0, 25, 0));
}

#[test]
fn without_baselines_changes_are_zero() {
    let items = bundled_feedback().unwrap();
    let scores = compute_happiness_with(&items, &KeywordClassifier, &StaticBaselines::empty());
    assert!(scores.iter().all(|s| s.daily_change == 0 && s.product_id == 0));
}

#[test]
fn scoring_leaves_input_untouched() {
    let items = bundled_feedback().unwrap();
    let before = items.clone();
    let first = compute_happiness(&items);
    let second = compute_happiness(&items);
    assert_eq!(items, before);
    assert_eq!(first, second);
}

#[test]
fn query_helpers_agree_with_scores() {
    let items = bundled_feedback().unwrap();
    for score in compute_happiness(&items) {
        let all = query::feedback_for_product(&items, &score.product);
        let technical = query::technical_issues(&items, &score.product);
        let feedback = query::feedback_only(&items, &score.product);
        assert_eq!(all.len(), score.total_feedback);
        assert_eq!(technical.len(), score.technical_issues);
        assert_eq!(feedback.len(), score.feedback_items);
    }
}

#[test]
fn quarterly_overlay_on_fixture() {
    let items = bundled_feedback().unwrap();
    let scores = compute_happiness(&items);

    let mut quarterly = HashMap::new();
    quarterly.insert(
        3,
        ["Q1", "Q2", "Q3", "Q4"]
            .iter()
            .zip([80, 84, 88, 91])
            .map(|(quarter, score)| QuarterlyScore {
                quarter: quarter.to_string(),
                score,
            })
            .collect::<Vec<_>>(),
    );

    let trends = trend::apply_quarterly(&scores, &quarterly);
    let business = trends
        .iter()
        .find(|t| t.product == "Business Unlimited")
        .unwrap();
    assert_eq!((business.happiness_score, business.change), (91, 3));
    assert!(business.quarterly);

    let hotspot = trends.iter().find(|t| t.product == "Mobile Hotspot").unwrap();
    assert_eq!((hotspot.happiness_score, hotspot.change), (0, -70));
    assert!(!hotspot.chi_loaded);
}

#[test]
fn scores_serialize_in_dashboard_shape() {
    let items = bundled_feedback().unwrap();
    let scores = compute_happiness(&items);
    let json = serde_json::to_value(&scores[0]).unwrap();
    assert_eq!(json["product"], "Mobile Hotspot");
    assert_eq!(json["productId"], 1);
    assert_eq!(json["happinessScore"], 0);
    assert_eq!(json["totalFeedback"], 5);
    assert_eq!(json["technicalIssues"], 3);
    assert_eq!(json["feedbackItems"], 2);
    assert_eq!(json["positiveCount"], 1);
    assert_eq!(json["dailyChange"], -70);
}
