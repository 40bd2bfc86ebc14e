//! Application State

use std::collections::HashMap;
use std::sync::Arc;

use vision_core::VisionProvider;
use vision_payments::{
    CheckoutManager, MemoryTokenStore, MemoryTransactionStore, WebhookReconciler,
};

use crate::gatekeeper::Gatekeeper;
use crate::metrics::Metrics;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Generation provider (LLM proxy or mock)
    pub provider: Arc<dyn VisionProvider>,

    /// Per-device token ledger
    pub ledger: Arc<MemoryTokenStore>,

    /// Check/consume/generate/refund orchestration
    pub gatekeeper: Arc<Gatekeeper>,

    /// Checkout manager (None when the payment provider is not configured)
    pub checkout: Option<Arc<CheckoutManager<MemoryTransactionStore>>>,

    /// Webhook reconciler; active even without a checkout manager
    pub reconciler: Arc<WebhookReconciler<MemoryTokenStore, MemoryTransactionStore>>,

    /// SKU -> provider product id, for the products listing
    pub product_ids: Arc<HashMap<String, String>>,

    /// Process metric set
    pub metrics: Arc<Metrics>,

    /// Metric/health tool label
    pub tool_name: String,

    /// Whether the generation provider has credentials
    pub generator_configured: bool,
}
