//! Checkout Session Manager
//!
//! Turns a "buy this SKU" request into a hosted checkout session and a
//! pending transaction row. The provider call carries the device id, SKU
//! and token count as metadata it must echo back, which is how the later
//! webhook finds its way to the right device.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::error::{PaymentError, Result};
use crate::provider::{CheckoutMetadata, CheckoutParams, PaymentProvider};
use crate::transaction::{PaymentTransaction, TransactionStore};

/// Where the provider sends the buyer afterwards, absent per-request URLs
#[derive(Clone, Debug)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self {
            success_url: "https://future-visualizer.demo.densematrix.ai/payment/success".into(),
            cancel_url: "https://future-visualizer.demo.densematrix.ai/pricing".into(),
        }
    }
}

/// A checkout initiation request
#[derive(Clone, Debug, Deserialize)]
pub struct CheckoutRequest {
    pub product_sku: String,
    pub device_id: String,
    #[serde(default)]
    pub success_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
}

/// A created checkout session, ready for client redirect
#[derive(Clone, Debug, Serialize)]
pub struct CheckoutSession {
    pub checkout_url: String,
    pub checkout_id: String,
}

/// Checkout session manager
///
/// Validates the SKU against the catalog, maps it to the provider-side
/// product id from configuration, opens the hosted session, and records
/// the pending transaction. Provider failure leaves no partial row.
pub struct CheckoutManager<S: TransactionStore> {
    provider: Arc<dyn PaymentProvider>,
    transactions: Arc<S>,
    product_ids: HashMap<String, String>,
    urls: CheckoutUrls,
}

impl<S: TransactionStore> CheckoutManager<S> {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        transactions: Arc<S>,
        product_ids: HashMap<String, String>,
        urls: CheckoutUrls,
    ) -> Self {
        Self {
            provider,
            transactions,
            product_ids,
            urls,
        }
    }

    /// Create a hosted checkout session and record it as pending
    pub async fn create(&self, request: CheckoutRequest) -> Result<CheckoutSession> {
        let product = catalog::find(&request.product_sku)
            .ok_or_else(|| PaymentError::UnknownProduct(request.product_sku.clone()))?;

        let product_id = self
            .product_ids
            .get(product.sku)
            .ok_or_else(|| PaymentError::NotProvisioned(request.product_sku.clone()))?;

        let params = CheckoutParams {
            product_id: product_id.clone(),
            success_url: request
                .success_url
                .unwrap_or_else(|| self.urls.success_url.clone()),
            cancel_url: request
                .cancel_url
                .unwrap_or_else(|| self.urls.cancel_url.clone()),
            metadata: CheckoutMetadata {
                device_id: request.device_id.clone(),
                product_sku: product.sku.to_string(),
                tokens: product.tokens.to_string(),
            },
        };

        let hosted = self.provider.create_checkout(&params).await?;

        self.transactions
            .insert(PaymentTransaction::pending(
                &hosted.id,
                &request.device_id,
                product,
            ))?;

        tracing::info!(
            checkout_id = %hosted.id,
            device_id = %request.device_id,
            product_sku = %product.sku,
            tokens = product.tokens,
            amount_cents = product.price_cents,
            provider = %self.provider.name(),
            "Checkout session created"
        );

        Ok(CheckoutSession {
            checkout_url: hosted.checkout_url,
            checkout_id: hosted.id,
        })
    }
}
