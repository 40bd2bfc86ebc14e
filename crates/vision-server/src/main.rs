//! Future Visualizer HTTP Server
//!
//! Axum binary wiring the token ledger, checkout manager, webhook
//! reconciler and generation gatekeeper behind the REST API.

mod config;
mod gatekeeper;
mod handlers;
mod metrics;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vision_core::VisionProvider;
use vision_payments::{
    CheckoutManager, CreemClient, MemoryTokenStore, MemoryTransactionStore, WebhookReconciler,
};
use vision_runtime::LlmProxyProvider;

use crate::config::Settings;
use crate::gatekeeper::Gatekeeper;
use crate::metrics::Metrics;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    // Initialize the generation provider
    let provider = Arc::new(LlmProxyProvider::new(settings.proxy.clone()));
    let generator_configured = provider.is_configured();

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to LLM proxy at {}", settings.proxy.base_url),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ LLM proxy not reachable - generation will fail");
            tracing::warn!("  Check LLM_PROXY_URL and LLM_PROXY_KEY in .env");
        }
    }

    // Stores and metrics
    let metrics = Arc::new(Metrics::new(&settings.tool_name)?);
    let ledger = Arc::new(MemoryTokenStore::new());
    let transactions = Arc::new(MemoryTransactionStore::new());

    let gatekeeper = Arc::new(Gatekeeper::new(
        Arc::clone(&ledger) as Arc<dyn vision_payments::TokenStore>,
        Arc::clone(&provider) as Arc<dyn VisionProvider>,
        Arc::clone(&metrics),
    ));

    // Payments: checkout requires provider credentials, webhook
    // reconciliation works either way
    let checkout = if settings.creem.api_key.is_empty() {
        tracing::warn!("⚠ Creem not configured - checkout disabled");
        tracing::warn!("  Set CREEM_API_KEY and CREEM_PRODUCT_IDS in .env");
        None
    } else {
        tracing::info!(
            "✓ Creem configured ({} SKUs provisioned)",
            settings.product_ids.len()
        );
        Some(Arc::new(CheckoutManager::new(
            Arc::new(CreemClient::new(settings.creem.clone())),
            Arc::clone(&transactions),
            settings.product_ids.clone(),
            settings.checkout_urls.clone(),
        )))
    };

    let reconciler = Arc::new(WebhookReconciler::new(
        Arc::clone(&ledger),
        Arc::clone(&transactions),
        settings.webhook_secret.clone(),
    ));
    if reconciler.verification_disabled() {
        tracing::warn!("⚠ Webhook signature verification DISABLED (permissive mode)");
        tracing::warn!("  Set CREEM_WEBHOOK_SECRET to enforce signatures");
    }

    // Build application state
    let state = AppState {
        provider,
        ledger,
        gatekeeper,
        checkout,
        reconciler,
        product_ids: Arc::new(settings.product_ids.clone()),
        metrics,
        tool_name: settings.tool_name.clone(),
        generator_configured,
    };

    let app = handlers::app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 future-visualizer running on http://{}", settings.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /                     - Service info");
    tracing::info!("  GET  /health               - Health check");
    tracing::info!("  GET  /metrics              - Prometheus metrics");
    tracing::info!("  GET  /api/v1/products      - Products and pricing");
    tracing::info!("  GET  /api/v1/tokens/status - Token balance (X-Device-Id)");
    tracing::info!("  POST /api/v1/visualize     - Generate a vision (X-Device-Id)");
    tracing::info!("  POST /api/v1/checkout      - Create checkout session");
    tracing::info!("  POST /api/v1/webhook       - Payment webhook receiver");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
