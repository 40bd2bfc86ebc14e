//! # vision-payments
//!
//! Token metering and payment reconciliation for the Future Visualizer
//! backend: the per-device token ledger, the fixed product catalog,
//! hosted checkout sessions, and exactly-once webhook reconciliation.
//!
//! ## Purchase Flow
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌─────────────┐
//! │   Client    │────▶│  Hosted Checkout │────▶│   Client    │
//! │  (pricing)  │     │   (provider)     │     │  (success)  │
//! └─────────────┘     └────────┬─────────┘     └─────────────┘
//!                              │ webhook
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │   WebhookReconciler   │── claim pending ──▶ credit
//!                  └───────────────────────┘     exactly once
//! ```
//!
//! A checkout writes a `pending` [`PaymentTransaction`]; the provider's
//! signed webhook flips it to `completed` and credits the ledger. The flip
//! is a conditional claim, so redelivered webhooks can never double-credit.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vision_payments::{CheckoutManager, CheckoutRequest, WebhookReconciler};
//!
//! let session = checkout.create(CheckoutRequest {
//!     product_sku: "standard".into(),
//!     device_id: "dev-1".into(),
//!     success_url: None,
//!     cancel_url: None,
//! }).await?;
//!
//! // Redirect user to: session.checkout_url
//! // Later, the provider calls back:
//! let outcome = reconciler.handle(&raw_body, signature_header)?;
//! ```

pub mod catalog;
pub mod checkout;
pub mod error;
pub mod ledger;
pub mod provider;
pub mod transaction;
pub mod webhook;

pub use catalog::{Product, PRODUCTS};
pub use checkout::{CheckoutManager, CheckoutRequest, CheckoutSession, CheckoutUrls};
pub use error::{PaymentError, Result};
pub use ledger::{
    ConsumeOutcome, GenerationAllowance, MemoryTokenStore, TokenAccount, TokenStatus, TokenStore,
};
pub use provider::{CreemClient, CreemConfig, MockPaymentProvider, PaymentProvider};
pub use transaction::{
    MemoryTransactionStore, PaymentTransaction, TransactionStatus, TransactionStore,
};
pub use webhook::{WebhookOutcome, WebhookReconciler};
