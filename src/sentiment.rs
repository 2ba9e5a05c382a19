//! Keyword sentiment classifier.
//!
//! Transcripts are lowercased and checked for each cue word as a plain
//! substring, so "lovely" matches "love". A cue counts once per transcript no
//! matter how often it appears.

use crate::models::Sentiment;

pub const POSITIVE_CUES: [&str; 6] = ["love", "amazing", "excellent", "great", "best", "saved"];

pub const NEGATIVE_CUES: [&str; 8] = [
    "impossible",
    "frustrated",
    "confused",
    "slow",
    "drop",
    "cut",
    "throttle",
    "spotty",
];

pub trait SentimentClassifier {
    fn classify(&self, transcript: &str) -> Sentiment;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl SentimentClassifier for KeywordClassifier {
    fn classify(&self, transcript: &str) -> Sentiment {
        classify(transcript)
    }
}

pub fn classify(transcript: &str) -> Sentiment {
    let lowered = transcript.to_lowercase();
    let positive = cue_hits(&lowered, &POSITIVE_CUES);
    let negative = cue_hits(&lowered, &NEGATIVE_CUES);

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

fn cue_hits(lowered: &str, cues: &[&str]) -> usize {
    cues.iter().filter(|cue| lowered.contains(*cue)).count()
}
