//! Feedback loading and validation.
//!
//! Records are read leniently and then checked one by one, so a bad document
//! reports every offending record instead of the first serde failure.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::LoadError;
use crate::models::{FeedbackItem, FeedbackType};

const BUNDLED_FIXTURE: &str = include_str!("../data/feedback.json");

#[derive(Debug, Deserialize)]
struct RawFeedback {
    id: Option<i64>,
    product: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    transcript: Option<String>,
    phone: Option<String>,
    location: Option<String>,
    timestamp: Option<String>,
}

pub fn bundled_feedback() -> Result<Vec<FeedbackItem>, LoadError> {
    parse_feedback(BUNDLED_FIXTURE)
}

pub fn load_feedback_file(path: &Path) -> Result<Vec<FeedbackItem>, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let items = parse_feedback(&contents)?;
    tracing::info!(path = %path.display(), records = items.len(), "loaded feedback");
    Ok(items)
}

pub fn parse_feedback(json: &str) -> Result<Vec<FeedbackItem>, LoadError> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    let mut items = Vec::with_capacity(values.len());
    let mut problems = Vec::new();
    let mut seen_ids = HashSet::new();

    for (index, value) in values.into_iter().enumerate() {
        let raw: RawFeedback = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                problems.push(format!("record {index}: {e}"));
                continue;
            }
        };

        match validate(index, raw) {
            Ok(item) => {
                if seen_ids.insert(item.id) {
                    items.push(item);
                } else {
                    problems.push(format!("record {index}: duplicate id {}", item.id));
                }
            }
            Err(mut errors) => problems.append(&mut errors),
        }
    }

    if problems.is_empty() {
        Ok(items)
    } else {
        Err(LoadError::InvalidRecords(problems))
    }
}

fn validate(index: usize, raw: RawFeedback) -> Result<FeedbackItem, Vec<String>> {
    let mut errors = Vec::new();

    let product = match raw.product {
        Some(product) if !product.trim().is_empty() => Some(product),
        Some(_) => {
            errors.push(format!("record {index}: product is blank"));
            None
        }
        None => {
            errors.push(format!("record {index}: missing product"));
            None
        }
    };

    let kind = match raw.kind.as_deref() {
        Some(value) => match FeedbackType::parse(value) {
            Some(kind) => Some(kind),
            None => {
                errors.push(format!(
                    "record {index}: unknown type '{value}' (expected Technical or Feedback)"
                ));
                None
            }
        },
        None => {
            errors.push(format!("record {index}: missing type"));
            None
        }
    };

    if raw.transcript.is_none() {
        errors.push(format!("record {index}: missing transcript"));
    }

    let timestamp = match raw.timestamp.as_deref() {
        Some(value) => match DateTime::parse_from_rfc3339(value) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(e) => {
                errors.push(format!("record {index}: invalid timestamp '{value}': {e}"));
                None
            }
        },
        None => None,
    };

    match (product, kind, raw.transcript) {
        (Some(product), Some(kind), Some(transcript)) if errors.is_empty() => Ok(FeedbackItem {
            // Records without an id take their 1-based position.
            id: raw.id.unwrap_or(index as i64 + 1),
            product,
            kind,
            transcript,
            phone: raw.phone,
            location: raw.location,
            timestamp,
        }),
        _ => Err(errors),
    }
}
