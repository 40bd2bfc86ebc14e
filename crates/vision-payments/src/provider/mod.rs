//! Payment Provider Abstraction
//!
//! The checkout manager talks to a `PaymentProvider` trait object, so the
//! hosted-checkout vendor is swappable and tests run against a mock that
//! never leaves the process.

mod creem;
mod mock;

pub use creem::{CreemClient, CreemConfig};
pub use mock::MockPaymentProvider;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Metadata attached to a checkout session.
///
/// The provider echoes this back verbatim in webhook events, which is how
/// a completed payment finds its way back to the right device. Values are
/// strings because providers commonly flatten metadata to string maps.
#[derive(Clone, Debug, Serialize)]
pub struct CheckoutMetadata {
    pub device_id: String,
    pub product_sku: String,
    pub tokens: String,
}

/// Request to create a hosted checkout session
#[derive(Clone, Debug, Serialize)]
pub struct CheckoutParams {
    /// Provider-side product id (not the catalog SKU)
    pub product_id: String,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: CheckoutMetadata,
}

/// A created checkout session
#[derive(Clone, Debug)]
pub struct HostedCheckout {
    /// Provider-issued checkout id, later echoed in webhooks
    pub id: String,
    /// URL the client redirects the user to
    pub checkout_url: String,
}

/// Hosted-checkout provider trait
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Create a hosted checkout session
    async fn create_checkout(&self, params: &CheckoutParams) -> Result<HostedCheckout>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_params_wire_shape() {
        let params = CheckoutParams {
            product_id: "prod_abc".to_string(),
            success_url: "https://example.com/success".to_string(),
            cancel_url: "https://example.com/cancel".to_string(),
            metadata: CheckoutMetadata {
                device_id: "dev-1".to_string(),
                product_sku: "standard".to_string(),
                tokens: "15".to_string(),
            },
        };

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["product_id"], "prod_abc");
        assert_eq!(value["success_url"], "https://example.com/success");
        assert_eq!(value["cancel_url"], "https://example.com/cancel");
        assert_eq!(value["metadata"]["device_id"], "dev-1");
        assert_eq!(value["metadata"]["product_sku"], "standard");
        // tokens travel as a string, the way provider metadata maps do
        assert_eq!(value["metadata"]["tokens"], "15");
    }
}
