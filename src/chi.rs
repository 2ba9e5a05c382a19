//! Client for the external quarterly CHI service.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::config::ChiConfig;
use crate::error::ChiError;
use crate::models::QuarterlyScore;

const USER_AGENT: &str = concat!("happiness-index/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct QuarterlyResponse {
    success: bool,
    #[serde(default)]
    quarterly_data: Vec<QuarterlyScore>,
}

/// Decodes a quarterly payload; a reported failure is an error even when data is present.
pub fn parse_quarterly(product_id: i64, body: &str) -> Result<Vec<QuarterlyScore>, ChiError> {
    let parsed: QuarterlyResponse = serde_json::from_str(body)?;
    if !parsed.success {
        return Err(ChiError::Unsuccessful(product_id));
    }
    Ok(parsed.quarterly_data)
}

pub struct ChiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ChiClient {
    pub fn new(config: &ChiConfig) -> Result<Self, ChiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn quarterly_url(&self, product_id: i64) -> String {
        format!("{}/api/chi/quarterly/{product_id}", self.base_url)
    }

    pub async fn quarterly(&self, product_id: i64) -> Result<Vec<QuarterlyScore>, ChiError> {
        let url = self.quarterly_url(product_id);
        tracing::debug!(product_id, %url, "fetching quarterly CHI");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChiError::Api(status.as_u16(), body));
        }

        let body = response.text().await?;
        parse_quarterly(product_id, &body)
    }

    /// Fetches quarterly scores for each id, skipping products the service cannot answer for.
    pub async fn quarterly_for(&self, product_ids: &[i64]) -> HashMap<i64, Vec<QuarterlyScore>> {
        let mut found = HashMap::new();
        for &product_id in product_ids {
            match self.quarterly(product_id).await {
                Ok(quarters) => {
                    tracing::info!(product_id, quarters = quarters.len(), "quarterly CHI loaded");
                    found.insert(product_id, quarters);
                }
                Err(e) => {
                    tracing::warn!(product_id, error = %e, "quarterly CHI unavailable");
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_quarterly_url_without_double_slash() {
        let client = ChiClient::new(&ChiConfig {
            base_url: "http://localhost:8000/".to_string(),
            timeout_secs: 5,
            product_ids: vec![2],
        })
        .unwrap();
        assert_eq!(
            client.quarterly_url(2),
            "http://localhost:8000/api/chi/quarterly/2"
        );
    }

    #[test]
    fn parses_service_payload() {
        let body = r#"{
            "success": true,
            "product_id": 1,
            "quarterly_data": [
                {"quarter": "Q1", "score": 62},
                {"quarter": "Q2", "score": 58},
                {"quarter": "Q3", "score": 49},
                {"quarter": "Q4", "score": 41}
            ]
        }"#;
        let parsed: QuarterlyResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.quarterly_data.len(), 4);
        assert_eq!(parsed.quarterly_data[3].score, 41);
    }

    #[test]
    fn fractional_scores_are_decode_errors() {
        let body = r#"{"success": true, "quarterly_data": [{"quarter": "Q1", "score": 61.5}]}"#;
        let err = parse_quarterly(1, body).unwrap_err();
        assert!(matches!(err, ChiError::Decode(_)));
        assert!(err.to_string().starts_with("unreadable CHI payload"));
    }

    #[test]
    fn non_json_body_is_decode_error() {
        let err = parse_quarterly(1, "<html>gateway timeout</html>").unwrap_err();
        assert!(matches!(err, ChiError::Decode(_)));
    }

    #[test]
    fn reported_failure_is_unsuccessful() {
        let err = parse_quarterly(7, r#"{"success": false}"#).unwrap_err();
        assert!(matches!(err, ChiError::Unsuccessful(7)));
    }

    #[test]
    fn failure_payload_needs_no_data() {
        let parsed: QuarterlyResponse =
            serde_json::from_str(r#"{"success": false, "error": "unknown product"}"#).unwrap();
        assert!(!parsed.success);
        assert!(parsed.quarterly_data.is_empty());
    }
}
