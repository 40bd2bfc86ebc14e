//! Creem Payment Client
//!
//! Thin HTTP client for Creem's hosted-checkout API. One call matters:
//! `POST /v1/checkouts` with a bearer key, returning the checkout id and
//! the URL to redirect the buyer to.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{PaymentError, Result};
use crate::provider::{CheckoutParams, HostedCheckout, PaymentProvider};

/// Creem API configuration
#[derive(Clone, Debug)]
pub struct CreemConfig {
    /// API base URL
    pub base_url: String,
    /// Secret API key
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CreemConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.creem.io".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl CreemConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("CREEM_API_URL")
                .unwrap_or_else(|_| "https://api.creem.io".to_string()),
            api_key: std::env::var("CREEM_API_KEY").unwrap_or_default(),
            timeout_secs: std::env::var("CREEM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

/// Creem API client
pub struct CreemClient {
    client: reqwest::Client,
    config: CreemConfig,
}

impl CreemClient {
    pub fn new(config: CreemConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn checkouts_url(&self) -> String {
        format!("{}/v1/checkouts", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct CreemCheckoutResponse {
    id: String,
    checkout_url: String,
}

#[async_trait]
impl PaymentProvider for CreemClient {
    fn name(&self) -> &str {
        "Creem"
    }

    async fn create_checkout(&self, params: &CheckoutParams) -> Result<HostedCheckout> {
        let response = self
            .client
            .post(self.checkouts_url())
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(params)
            .send()
            .await
            .map_err(|e| PaymentError::Provider(format!("Creem request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Provider(format!(
                "Creem API error: {} - {}",
                status, body
            )));
        }

        let checkout: CreemCheckoutResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Provider(format!("Creem response parse error: {}", e)))?;

        Ok(HostedCheckout {
            id: checkout.id,
            checkout_url: checkout.checkout_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CreemConfig::default();
        assert_eq!(config.base_url, "https://api.creem.io");
        assert!(config.api_key.is_empty());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_checkouts_url_tolerates_trailing_slash() {
        let client = CreemClient::new(CreemConfig {
            base_url: "https://api.creem.io/".to_string(),
            ..CreemConfig::default()
        });
        assert_eq!(client.checkouts_url(), "https://api.creem.io/v1/checkouts");
    }

    #[test]
    fn test_checkout_response_parses() {
        let json = r#"{"id": "co_123", "checkout_url": "https://creem.io/pay/co_123", "status": "open"}"#;
        let response: CreemCheckoutResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, "co_123");
        assert_eq!(response.checkout_url, "https://creem.io/pay/co_123");
    }
}
