//! Customer happiness scoring over support feedback.
//!
//! Feedback records are classified with a keyword sentiment model, grouped
//! per product and reduced to a 0-100 happiness score with a change against a
//! reference baseline. Loading, the Postgres source, the quarterly CHI client
//! and reporting sit around that core.

pub mod baseline;
pub mod chi;
pub mod config;
pub mod db;
pub mod error;
pub mod happiness;
pub mod loader;
pub mod models;
pub mod query;
pub mod report;
pub mod sentiment;
pub mod trend;

pub use happiness::{compute_happiness, compute_happiness_with};
pub use models::{FeedbackItem, FeedbackType, ProductHappiness, Sentiment};
pub use sentiment::classify;
