use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackType {
    Technical,
    Feedback,
}

impl FeedbackType {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackType::Technical => "Technical",
            FeedbackType::Feedback => "Feedback",
        }
    }

    /// Parses the wire name, case-sensitively, as stored in the fixture and the database.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Technical" => Some(FeedbackType::Technical),
            "Feedback" => Some(FeedbackType::Feedback),
            _ => None,
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: i64,
    pub product: String,
    #[serde(rename = "type")]
    pub kind: FeedbackType,
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl FeedbackItem {
    pub fn is_technical(&self) -> bool {
        self.kind == FeedbackType::Technical
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductHappiness {
    pub product: String,
    pub product_id: i64,
    pub happiness_score: i64,
    pub total_feedback: usize,
    pub technical_issues: usize,
    pub feedback_items: usize,
    pub positive_count: usize,
    /// Positive means improving, negative means worsening.
    pub daily_change: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyScore {
    pub quarter: String,
    pub score: i64,
}

/// A product's happiness after the quarterly CHI overlay has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTrend {
    pub product: String,
    pub product_id: i64,
    pub happiness_score: i64,
    pub change: i64,
    /// Score and change come from the latest two CHI quarters.
    pub quarterly: bool,
    /// The quarterly CHI service answered for this product, even with too few
    /// quarters to apply. The CHI happiness summary endpoint is not consulted.
    pub chi_loaded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentMix {
    pub product: String,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}
