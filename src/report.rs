use std::collections::HashMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::baseline::BaselineProvider;
use crate::happiness;
use crate::models::{FeedbackItem, FeedbackType, ProductHappiness, Sentiment, SentimentMix};
use crate::sentiment::SentimentClassifier;

/// Products scoring below this are flagged for attention.
pub const ATTENTION_THRESHOLD: i64 = 50;

pub fn summarize_sentiment(
    items: &[FeedbackItem],
    classifier: &dyn SentimentClassifier,
) -> Vec<SentimentMix> {
    let mut map: HashMap<&str, SentimentMix> = HashMap::new();

    for item in items.iter().filter(|item| item.kind == FeedbackType::Feedback) {
        let entry = map.entry(item.product.as_str()).or_insert_with(|| SentimentMix {
            product: item.product.clone(),
            positive: 0,
            negative: 0,
            neutral: 0,
        });
        match classifier.classify(&item.transcript) {
            Sentiment::Positive => entry.positive += 1,
            Sentiment::Negative => entry.negative += 1,
            Sentiment::Neutral => entry.neutral += 1,
        }
    }

    let mut mixes: Vec<SentimentMix> = map.into_values().collect();
    mixes.sort_by(|a, b| a.product.cmp(&b.product));
    mixes
}

pub fn needs_attention(score: &ProductHappiness) -> bool {
    score.happiness_score < ATTENTION_THRESHOLD || score.daily_change < 0
}

pub fn build_report(
    scope: Option<&str>,
    generated_at: DateTime<Utc>,
    items: &[FeedbackItem],
    classifier: &dyn SentimentClassifier,
    baselines: &dyn BaselineProvider,
) -> String {
    let scores = happiness::compute_happiness_with(items, classifier, baselines);
    let mixes = summarize_sentiment(items, classifier);

    let mut output = String::new();
    let scope_label = scope.unwrap_or("all products");

    let _ = writeln!(output, "# Customer Happiness Report");
    let _ = writeln!(
        output,
        "Generated for {} at {} from {} feedback records",
        scope_label,
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        items.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Product Happiness");

    if scores.is_empty() {
        let _ = writeln!(output, "No feedback recorded.");
    } else {
        let _ = writeln!(
            output,
            "| Product | Score | Daily change | Feedback | Technical | Positive |"
        );
        let _ = writeln!(output, "|---|---:|---:|---:|---:|---:|");
        for score in &scores {
            let _ = writeln!(
                output,
                "| {} | {}% | {:+} | {} | {} | {} |",
                score.product,
                score.happiness_score,
                score.daily_change,
                score.feedback_items,
                score.technical_issues,
                score.positive_count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Needs Attention");

    let flagged: Vec<&ProductHappiness> = scores.iter().filter(|s| needs_attention(s)).collect();
    if flagged.is_empty() {
        let _ = writeln!(output, "All products are at or above {ATTENTION_THRESHOLD}% and steady.");
    } else {
        for score in flagged {
            let _ = writeln!(
                output,
                "- {}: {}% ({:+} since yesterday, {} technical issues)",
                score.product, score.happiness_score, score.daily_change, score.technical_issues
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Sentiment Mix");

    if mixes.is_empty() {
        let _ = writeln!(output, "No general feedback recorded.");
    } else {
        for mix in &mixes {
            let _ = writeln!(
                output,
                "- {}: {} positive, {} negative, {} neutral",
                mix.product, mix.positive, mix.negative, mix.neutral
            );
        }
    }

    let mut recent: Vec<&FeedbackItem> = items.iter().filter(|i| i.is_technical()).collect();
    // Newest first; undated records sink to the bottom.
    recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Technical Issues");

    if recent.is_empty() {
        let _ = writeln!(output, "No technical issues recorded.");
    } else {
        for item in recent.iter().take(5) {
            let when = item
                .timestamp
                .map(|ts| ts.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "undated".to_string());
            let _ = writeln!(
                output,
                "- {} (#{}) on {}: {}",
                item.product, item.id, when, item.transcript
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::baseline::StaticBaselines;
    use crate::sentiment::KeywordClassifier;

    fn item(id: i64, product: &str, kind: FeedbackType, transcript: &str, day: u32) -> FeedbackItem {
        FeedbackItem {
            id,
            product: product.to_string(),
            kind,
            transcript: transcript.to_string(),
            phone: None,
            location: None,
            timestamp: Some(Utc.with_ymd_and_hms(2025, 11, day, 9, 0, 0).unwrap()),
        }
    }

    fn sample() -> Vec<FeedbackItem> {
        vec![
            item(1, "Magenta Max", FeedbackType::Feedback, "Love it", 7),
            item(2, "Magenta Max", FeedbackType::Feedback, "Too slow", 7),
            item(3, "Mobile Hotspot", FeedbackType::Technical, "Overheats", 6),
            item(4, "Mobile Hotspot", FeedbackType::Technical, "Reboots", 8),
            item(5, "Mobile Hotspot", FeedbackType::Feedback, "fine", 8),
        ]
    }

    #[test]
    fn sentiment_mix_counts_feedback_only() {
        let mixes = summarize_sentiment(&sample(), &KeywordClassifier);
        assert_eq!(mixes.len(), 2);
        assert_eq!(mixes[0].product, "Magenta Max");
        assert_eq!((mixes[0].positive, mixes[0].negative, mixes[0].neutral), (1, 1, 0));
        assert_eq!((mixes[1].positive, mixes[1].negative, mixes[1].neutral), (0, 0, 1));
    }

    #[test]
    fn report_lists_worst_product_first() {
        let generated = Utc.with_ymd_and_hms(2025, 11, 9, 12, 0, 0).unwrap();
        let report = build_report(
            None,
            generated,
            &sample(),
            &KeywordClassifier,
            &StaticBaselines::default(),
        );
        assert!(report.starts_with("# Customer Happiness Report"));
        assert!(report.contains("Generated for all products at 2025-11-09 12:00 UTC"));

        let hotspot = report.find("| Mobile Hotspot | 0% | -70 |").unwrap();
        let magenta = report.find("| Magenta Max | 50% | -35 |").unwrap();
        assert!(hotspot < magenta);
        assert!(report.contains("- Mobile Hotspot: 0% (-70 since yesterday, 2 technical issues)"));
    }

    #[test]
    fn recent_technical_issues_newest_first() {
        let generated = Utc.with_ymd_and_hms(2025, 11, 9, 12, 0, 0).unwrap();
        let report = build_report(
            Some("Mobile Hotspot"),
            generated,
            &sample(),
            &KeywordClassifier,
            &StaticBaselines::default(),
        );
        let newer = report.find("- Mobile Hotspot (#4) on 2025-11-08: Reboots").unwrap();
        let older = report.find("- Mobile Hotspot (#3) on 2025-11-06: Overheats").unwrap();
        assert!(newer < older);
    }

    #[test]
    fn empty_input_renders_placeholders() {
        let generated = Utc.with_ymd_and_hms(2025, 11, 9, 12, 0, 0).unwrap();
        let report = build_report(
            None,
            generated,
            &[],
            &KeywordClassifier,
            &StaticBaselines::default(),
        );
        assert!(report.contains("No feedback recorded."));
        assert!(report.contains("No technical issues recorded."));
    }
}
