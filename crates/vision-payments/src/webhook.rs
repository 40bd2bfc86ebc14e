//! Webhook Reconciliation
//!
//! Verifies inbound payment notifications and credits the ledger exactly
//! once per completed checkout. Verification is HMAC-SHA256 over the raw
//! body, hex-encoded in the `creem-signature` header; when no secret is
//! configured verification is skipped entirely (permissive mode, an
//! explicit operational choice the server surfaces in `/health`).

use std::sync::Arc;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;

use crate::error::{PaymentError, Result};
use crate::ledger::TokenStore;
use crate::transaction::TransactionStore;

type HmacSha256 = Hmac<Sha256>;

/// Event type that triggers ledger action; everything else is ignored
pub const CHECKOUT_COMPLETED: &str = "checkout.completed";

/// Hex HMAC-SHA256 of `body` under `secret`, as the provider computes it.
///
/// Exposed so tests and operator tooling can produce valid signatures.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time signature check
fn verify(secret: &str, body: &[u8], signature: &str) -> Result<()> {
    let expected = hex::decode(signature)
        .map_err(|_| PaymentError::Signature("signature is not hex".into()))?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| PaymentError::Signature("signature mismatch".into()))
}

/// The provider's event envelope
#[derive(Debug, Deserialize)]
struct WebhookEnvelope {
    #[serde(rename = "type", default)]
    event_type: Option<String>,
    #[serde(default)]
    data: Option<EventData>,
}

#[derive(Debug, Deserialize)]
struct EventData {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    metadata: Option<Value>,
}

/// What a delivery amounted to.
///
/// Every variant is acknowledged with success to the provider; only
/// signature and parse failures are rejections, and those surface as
/// errors before an outcome exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Event type outside our interest, acknowledged and dropped
    Ignored { event_type: String },

    /// `checkout.completed` for a checkout id we never recorded
    UnknownCheckout { checkout_id: String },

    /// Redelivery of an already-reconciled checkout
    AlreadyProcessed { checkout_id: String },

    /// The one claim that won: transaction completed, ledger credited
    Credited {
        checkout_id: String,
        device_id: String,
        product_sku: String,
        amount_cents: u32,
        tokens: u32,
        new_balance: u32,
    },
}

/// Webhook reconciler
pub struct WebhookReconciler<T: TokenStore, S: TransactionStore> {
    ledger: Arc<T>,
    transactions: Arc<S>,
    secret: Option<String>,
}

impl<T: TokenStore, S: TransactionStore> WebhookReconciler<T, S> {
    pub fn new(ledger: Arc<T>, transactions: Arc<S>, secret: Option<String>) -> Self {
        Self {
            ledger,
            transactions,
            secret,
        }
    }

    /// True when no signing secret is configured and deliveries are
    /// accepted unverified
    pub fn verification_disabled(&self) -> bool {
        self.secret.is_none()
    }

    /// Verify and process one delivery.
    ///
    /// The claim is a conditional pending→completed update, so concurrent
    /// duplicate deliveries for the same checkout credit exactly once.
    pub fn handle(&self, body: &[u8], signature: Option<&str>) -> Result<WebhookOutcome> {
        if let Some(secret) = &self.secret {
            let signature = signature
                .ok_or_else(|| PaymentError::Signature("missing signature header".into()))?;
            verify(secret, body, signature)?;
        }

        let envelope: WebhookEnvelope = serde_json::from_slice(body)
            .map_err(|e| PaymentError::Parse(format!("invalid webhook body: {}", e)))?;

        let event_type = envelope.event_type.unwrap_or_default();
        if event_type != CHECKOUT_COMPLETED {
            tracing::debug!(event_type = %event_type, "Ignoring webhook event");
            return Ok(WebhookOutcome::Ignored { event_type });
        }

        let data = envelope.data.unwrap_or(EventData {
            id: None,
            metadata: None,
        });
        let Some(checkout_id) = data.id.filter(|id| !id.is_empty()) else {
            tracing::warn!("checkout.completed event without a checkout id");
            return Ok(WebhookOutcome::Ignored { event_type });
        };

        // Exactly one delivery flips the row; the rest land here
        let Some(transaction) = self.transactions.claim_pending(&checkout_id)? else {
            return match self.transactions.get(&checkout_id)? {
                Some(_) => {
                    tracing::info!(checkout_id = %checkout_id, "Duplicate webhook delivery, no action");
                    Ok(WebhookOutcome::AlreadyProcessed { checkout_id })
                }
                None => {
                    tracing::warn!(checkout_id = %checkout_id, "Webhook for unknown checkout");
                    Ok(WebhookOutcome::UnknownCheckout { checkout_id })
                }
            };
        };

        // Live metadata wins over the stored snapshot when usable
        let metadata = data.metadata.unwrap_or(Value::Null);
        let device_id = metadata
            .get("device_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .unwrap_or(&transaction.device_id)
            .to_string();
        let tokens = metadata
            .get("tokens")
            .and_then(metadata_tokens)
            .unwrap_or(transaction.tokens_granted);

        let new_balance = self.ledger.credit(&device_id, tokens)?;

        tracing::info!(
            checkout_id = %checkout_id,
            device_id = %device_id,
            product_sku = %transaction.product_sku,
            tokens,
            amount_cents = transaction.amount_cents,
            new_balance,
            "Checkout completed, tokens credited"
        );

        Ok(WebhookOutcome::Credited {
            checkout_id,
            device_id,
            product_sku: transaction.product_sku,
            amount_cents: transaction.amount_cents,
            tokens,
            new_balance,
        })
    }
}

/// Token count from metadata: a positive integer, sent as a string or a
/// number. Anything else falls back to the transaction snapshot.
fn metadata_tokens(value: &Value) -> Option<u32> {
    let tokens = match value {
        Value::String(s) => s.trim().parse().ok()?,
        Value::Number(n) => u32::try_from(n.as_u64()?).ok()?,
        _ => return None,
    };
    (tokens > 0).then_some(tokens)
}
