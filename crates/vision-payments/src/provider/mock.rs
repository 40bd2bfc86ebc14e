//! Mock Payment Provider
//!
//! In-process provider for tests. Records every checkout request it sees
//! and can be flipped into a failing mode to exercise error paths.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::{PaymentError, Result};
use crate::provider::{CheckoutParams, HostedCheckout, PaymentProvider};

/// Mock provider for testing
pub struct MockPaymentProvider {
    fail: bool,
    requests: Mutex<Vec<CheckoutParams>>,
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentProvider {
    /// Provider that accepts every checkout
    pub fn new() -> Self {
        Self {
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Provider that rejects every checkout
    pub fn failing() -> Self {
        Self {
            fail: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<CheckoutParams> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    fn name(&self) -> &str {
        "MockProvider"
    }

    async fn create_checkout(&self, params: &CheckoutParams) -> Result<HostedCheckout> {
        if self.fail {
            return Err(PaymentError::Provider(
                "mock provider configured to fail".to_string(),
            ));
        }

        self.requests.lock().unwrap().push(params.clone());

        let id = format!("co_mock_{}", uuid::Uuid::new_v4().simple());
        Ok(HostedCheckout {
            checkout_url: format!("https://checkout.example.com/{}", id),
            id,
        })
    }
}
