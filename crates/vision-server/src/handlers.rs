//! HTTP Handlers
//!
//! Thin plumbing between the HTTP surface and the core components.
//! Device identity is the opaque `X-Device-Id` header the client supplies;
//! nobody authenticates it, which is a deliberate trust boundary.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use vision_core::{Language, Vision};
use vision_payments::{
    catalog, CheckoutRequest, CheckoutSession, PaymentError, TokenStatus, TokenStore,
    WebhookOutcome,
};

use crate::gatekeeper::GateError;
use crate::state::AppState;

/// Header carrying the opaque device identity
const DEVICE_HEADER: &str = "x-device-id";

/// Header carrying the webhook signature
const SIGNATURE_HEADER: &str = "creem-signature";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct RootResponse {
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub tool: String,
    pub version: &'static str,
    pub generator_configured: bool,
    pub payments_configured: bool,
    pub webhook_verification_disabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct VisualizeRequest {
    pub concept: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize)]
pub struct VisualizeResponse {
    #[serde(flatten)]
    pub vision: Vision,
    pub is_free_trial: bool,
    pub remaining_tokens: u32,
}

#[derive(Serialize)]
pub struct ProductInfo {
    pub sku: &'static str,
    pub tokens: u32,
    pub price_cents: u32,
    pub available: bool,
}

#[derive(Serialize)]
pub struct ProductsResponse {
    pub products: Vec<ProductInfo>,
}

#[derive(Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub payment_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_tokens: Option<u32>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            payment_required: false,
            remaining_tokens: None,
        }
    }

    fn payment_required(remaining: u32) -> Self {
        Self {
            error: "No tokens remaining. Please purchase more.".into(),
            code: "payment_required".into(),
            payment_required: true,
            remaining_tokens: Some(remaining),
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Extract the device identity, rejecting absent/blank headers
fn device_id(headers: &HeaderMap) -> Result<String, HandlerError> {
    headers
        .get(DEVICE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "X-Device-Id header required",
                    "missing_device_id",
                )),
            )
        })
}

// ============================================================================
// Handlers
// ============================================================================

/// Root endpoint
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        name: "Future Visualizer API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        tool: state.tool_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        generator_configured: state.generator_configured,
        payments_configured: state.checkout.is_some(),
        webhook_verification_disabled: state.reconciler.verification_disabled(),
    })
}

/// Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
        .into_response()
}

/// Products and pricing, with per-SKU provisioning status
pub async fn list_products(State(state): State<AppState>) -> Json<ProductsResponse> {
    let products = catalog::PRODUCTS
        .iter()
        .map(|product| ProductInfo {
            sku: product.sku,
            tokens: product.tokens,
            price_cents: product.price_cents,
            available: state.product_ids.contains_key(product.sku),
        })
        .collect();

    Json(ProductsResponse { products })
}

/// Token status for the requesting device
pub async fn token_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenStatus>, HandlerError> {
    let device_id = device_id(&headers)?;

    let status = state.ledger.status(&device_id).map_err(|e| {
        tracing::error!("Token status error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.user_message(), "internal_error")),
        )
    })?;

    Ok(Json(status))
}

/// Generate a vision of what a concept will look like in 10 years
pub async fn visualize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<VisualizeRequest>,
) -> Result<Json<VisualizeResponse>, HandlerError> {
    let device_id = device_id(&headers)?;

    let concept_chars = payload.concept.chars().count();
    if concept_chars == 0 || concept_chars > 500 {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new(
                "concept must be between 1 and 500 characters",
                "validation_error",
            )),
        ));
    }

    let reply = state
        .gatekeeper
        .request_generation(&device_id, &payload.concept, payload.language)
        .await
        .map_err(|e| match e {
            GateError::PaymentRequired { remaining } => (
                StatusCode::PAYMENT_REQUIRED,
                Json(ErrorResponse::payment_required(remaining)),
            ),
            GateError::Ledger(err) => {
                tracing::error!("Ledger error during generation: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(err.user_message(), "internal_error")),
                )
            }
            GateError::Generation(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    format!("Failed to generate vision: {}", err.user_message()),
                    "generation_failed",
                )),
            ),
        })?;

    Ok(Json(VisualizeResponse {
        vision: reply.vision,
        is_free_trial: reply.is_free_trial,
        remaining_tokens: reply.remaining_tokens,
    }))
}

/// Create a hosted checkout session
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<CheckoutSession>, HandlerError> {
    let checkout = state.checkout.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(
                "Payments not configured",
                "payments_disabled",
            )),
        )
    })?;

    let session = checkout.create(payload).await.map_err(|e| match e {
        PaymentError::UnknownProduct(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(e.user_message(), "invalid_product")),
        ),
        PaymentError::NotProvisioned(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(e.user_message(), "not_provisioned")),
        ),
        PaymentError::Provider(_) => {
            tracing::error!("Checkout provider error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.user_message(), "upstream_payment_error")),
            )
        }
        other => {
            tracing::error!("Checkout error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(other.user_message(), "internal_error")),
            )
        }
    })?;

    Ok(Json(session))
}

/// Payment webhook receiver.
///
/// Every processed delivery is acknowledged the same way, whatever it
/// amounted to; only signature and parse failures are rejections.
pub async fn creem_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, HandlerError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let outcome = state.reconciler.handle(&body, signature).map_err(|e| match e {
        PaymentError::Signature(_) => {
            tracing::warn!("Webhook signature failed: {}", e);
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Invalid signature", "invalid_signature")),
            )
        }
        PaymentError::Parse(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(e.user_message(), "invalid_payload")),
        ),
        other => {
            tracing::error!("Webhook processing error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Webhook processing failed",
                    "webhook_error",
                )),
            )
        }
    })?;

    if let WebhookOutcome::Credited {
        product_sku,
        amount_cents,
        ..
    } = &outcome
    {
        state
            .metrics
            .payment_success
            .with_label_values(&[product_sku])
            .inc();
        state
            .metrics
            .payment_revenue_cents
            .inc_by(u64::from(*amount_cents));
    }

    Ok(Json(WebhookAck { status: "ok" }))
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router over shared state
pub fn app(state: AppState) -> Router {
    use tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/tokens/status", get(token_status))
        .route("/api/v1/visualize", post(visualize))
        .route("/api/v1/checkout", post(create_checkout))
        .route("/api/v1/webhook", post(creem_webhook))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::metrics::track,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use vision_payments::{
        webhook::sign, CheckoutManager, CheckoutUrls, MemoryTokenStore, MemoryTransactionStore,
        MockPaymentProvider, WebhookReconciler,
    };
    use vision_runtime::MockVisionProvider;

    use crate::gatekeeper::Gatekeeper;
    use crate::metrics::Metrics;

    const SECRET: &str = "whsec_test123";

    struct TestApp {
        app: Router,
        ledger: Arc<MemoryTokenStore>,
    }

    fn test_app(provider: MockVisionProvider, secret: Option<&str>, payments: bool) -> TestApp {
        let provider: Arc<dyn vision_core::VisionProvider> = Arc::new(provider);
        let ledger = Arc::new(MemoryTokenStore::new());
        let transactions = Arc::new(MemoryTransactionStore::new());
        let metrics = Arc::new(Metrics::new("test").unwrap());

        let product_ids = HashMap::from([
            ("starter".to_string(), "prod_starter".to_string()),
            ("standard".to_string(), "prod_standard".to_string()),
        ]);

        let checkout = payments.then(|| {
            Arc::new(CheckoutManager::new(
                Arc::new(MockPaymentProvider::new()),
                Arc::clone(&transactions),
                product_ids.clone(),
                CheckoutUrls::default(),
            ))
        });

        let state = AppState {
            provider: Arc::clone(&provider),
            ledger: Arc::clone(&ledger),
            gatekeeper: Arc::new(Gatekeeper::new(
                Arc::clone(&ledger) as Arc<dyn TokenStore>,
                provider,
                Arc::clone(&metrics),
            )),
            checkout,
            reconciler: Arc::new(WebhookReconciler::new(
                Arc::clone(&ledger),
                transactions,
                secret.map(String::from),
            )),
            product_ids: Arc::new(product_ids),
            metrics,
            tool_name: "test".into(),
            generator_configured: true,
        };

        TestApp {
            app: app(state),
            ledger,
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        (status, body)
    }

    fn get_req(path: &str, device: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(device) = device {
            builder = builder.header("X-Device-Id", device);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(path: &str, device: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json");
        if let Some(device) = device {
            builder = builder.header("X-Device-Id", device);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn webhook_req(body: &[u8], signature: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/v1/webhook")
            .header("content-type", "application/json");
        if let Some(signature) = signature {
            builder = builder.header("Creem-Signature", signature);
        }
        builder.body(Body::from(body.to_vec())).unwrap()
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let t = test_app(MockVisionProvider::new(), Some(SECRET), true);

        let (status, body) = send(&t.app, get_req("/", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Future Visualizer API");

        let (status, body) = send(&t.app, get_req("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["tool"], "test");
        assert_eq!(body["payments_configured"], true);
        assert_eq!(body["webhook_verification_disabled"], false);
    }

    #[tokio::test]
    async fn test_health_surfaces_permissive_webhook_mode() {
        let t = test_app(MockVisionProvider::new(), None, true);
        let (_, body) = send(&t.app, get_req("/health", None)).await;
        assert_eq!(body["webhook_verification_disabled"], true);
    }

    #[tokio::test]
    async fn test_products_listing_marks_provisioned_skus() {
        let t = test_app(MockVisionProvider::new(), Some(SECRET), true);

        let (status, body) = send(&t.app, get_req("/api/v1/products", None)).await;
        assert_eq!(status, StatusCode::OK);

        let products = body["products"].as_array().unwrap();
        assert_eq!(products.len(), 3);
        let by_sku: HashMap<_, _> = products
            .iter()
            .map(|p| (p["sku"].as_str().unwrap(), p))
            .collect();
        assert_eq!(by_sku["standard"]["tokens"], 15);
        assert_eq!(by_sku["standard"]["price_cents"], 999);
        assert_eq!(by_sku["standard"]["available"], true);
        // "pro" is in the catalog but not mapped in this deployment
        assert_eq!(by_sku["pro"]["available"], false);
    }

    #[tokio::test]
    async fn test_token_status_requires_the_device_header() {
        let t = test_app(MockVisionProvider::new(), Some(SECRET), true);

        let (status, body) = send(&t.app, get_req("/api/v1/tokens/status", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "missing_device_id");

        let (status, body) =
            send(&t.app, get_req("/api/v1/tokens/status", Some("dev-1"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["device_id"], "dev-1");
        assert_eq!(body["tokens_remaining"], 0);
        assert_eq!(body["tokens_purchased"], 0);
        assert_eq!(body["free_trial_used"], false);
        assert_eq!(body["free_trial_available"], true);
    }

    #[tokio::test]
    async fn test_blank_device_header_is_rejected() {
        let t = test_app(MockVisionProvider::new(), Some(SECRET), true);
        let (status, _) = send(&t.app, get_req("/api/v1/tokens/status", Some("  "))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_trial_then_payment_required() {
        // Scenario: a new device gets one free generation, then a 402
        let t = test_app(MockVisionProvider::new(), Some(SECRET), true);

        let (status, body) = send(
            &t.app,
            post_json(
                "/api/v1/visualize",
                Some("dev-1"),
                json!({"concept": "iPhone"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "The Future of iPhone");
        assert_eq!(body["year"], 2036);
        assert_eq!(body["is_free_trial"], true);
        assert_eq!(body["remaining_tokens"], 0);

        let (status, body) = send(
            &t.app,
            post_json(
                "/api/v1/visualize",
                Some("dev-1"),
                json!({"concept": "Twitter"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body["code"], "payment_required");
        assert_eq!(body["payment_required"], true);
        assert_eq!(body["remaining_tokens"], 0);
    }

    #[tokio::test]
    async fn test_visualize_requires_the_device_header() {
        let t = test_app(MockVisionProvider::new(), Some(SECRET), true);
        let (status, _) = send(
            &t.app,
            post_json("/api/v1/visualize", None, json!({"concept": "iPhone"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_concept_is_unprocessable() {
        let t = test_app(MockVisionProvider::new(), Some(SECRET), true);
        let (status, body) = send(
            &t.app,
            post_json(
                "/api/v1/visualize",
                Some("dev-1"),
                json!({"concept": "x".repeat(501)}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "validation_error");

        // no token was consumed by the rejected request
        let status = t.ledger.status("dev-1").unwrap();
        assert!(!status.free_trial_used);
    }

    #[tokio::test]
    async fn test_failed_generation_refunds_and_reports_500() {
        let t = test_app(MockVisionProvider::failing(), Some(SECRET), true);

        let (status, body) = send(
            &t.app,
            post_json(
                "/api/v1/visualize",
                Some("dev-1"),
                json!({"concept": "iPhone"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "generation_failed");

        // trial burned, one plain token refunded in compensation
        let ledger_status = t.ledger.status("dev-1").unwrap();
        assert!(ledger_status.free_trial_used);
        assert_eq!(ledger_status.tokens_remaining, 1);
    }

    #[tokio::test]
    async fn test_checkout_then_webhook_credits_once() {
        // Scenario: pending checkout, completed webhook, idempotent redelivery
        let t = test_app(MockVisionProvider::new(), Some(SECRET), true);

        let (status, body) = send(
            &t.app,
            post_json(
                "/api/v1/checkout",
                None,
                json!({"product_sku": "standard", "device_id": "dev-1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let checkout_id = body["checkout_id"].as_str().unwrap().to_string();
        assert!(body["checkout_url"].as_str().unwrap().contains(&checkout_id));

        let event = json!({
            "type": "checkout.completed",
            "data": {
                "id": checkout_id,
                "metadata": {"device_id": "dev-1", "product_sku": "standard", "tokens": "15"}
            }
        })
        .to_string()
        .into_bytes();
        let signature = sign(SECRET, &event);

        let (status, body) = send(&t.app, webhook_req(&event, Some(&signature))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(t.ledger.status("dev-1").unwrap().tokens_remaining, 15);

        // identical redelivery: same ack, no extra credit
        let (status, body) = send(&t.app, webhook_req(&event, Some(&signature))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(t.ledger.status("dev-1").unwrap().tokens_remaining, 15);
        assert_eq!(t.ledger.status("dev-1").unwrap().tokens_purchased, 15);
    }

    #[tokio::test]
    async fn test_webhook_rejects_bad_signatures() {
        let t = test_app(MockVisionProvider::new(), Some(SECRET), true);
        let event = json!({"type": "checkout.completed", "data": {"id": "co_1"}})
            .to_string()
            .into_bytes();

        let (status, body) = send(&t.app, webhook_req(&event, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "invalid_signature");

        let bad = sign("wrong-secret", &event);
        let (status, _) = send(&t.app, webhook_req(&event, Some(&bad))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_webhook_acknowledges_unknown_events_and_checkouts() {
        let t = test_app(MockVisionProvider::new(), None, true);

        let other = json!({"type": "checkout.expired", "data": {"id": "co_1"}})
            .to_string()
            .into_bytes();
        let (status, body) = send(&t.app, webhook_req(&other, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let unknown = json!({"type": "checkout.completed", "data": {"id": "co_ghost"}})
            .to_string()
            .into_bytes();
        let (status, body) = send(&t.app, webhook_req(&unknown, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_webhook_rejects_unparseable_bodies() {
        let t = test_app(MockVisionProvider::new(), None, true);
        let (status, body) = send(&t.app, webhook_req(b"not json", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_payload");
    }

    #[tokio::test]
    async fn test_checkout_validation_errors() {
        let t = test_app(MockVisionProvider::new(), Some(SECRET), true);

        let (status, body) = send(
            &t.app,
            post_json(
                "/api/v1/checkout",
                None,
                json!({"product_sku": "enterprise", "device_id": "dev-1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_product");

        // in the catalog but not provisioned with the provider
        let (status, body) = send(
            &t.app,
            post_json(
                "/api/v1/checkout",
                None,
                json!({"product_sku": "pro", "device_id": "dev-1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "not_provisioned");
    }

    #[tokio::test]
    async fn test_checkout_unavailable_without_payment_config() {
        let t = test_app(MockVisionProvider::new(), Some(SECRET), false);
        let (status, body) = send(
            &t.app,
            post_json(
                "/api/v1/checkout",
                None,
                json!({"product_sku": "standard", "device_id": "dev-1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "payments_disabled");
    }

    #[tokio::test]
    async fn test_metrics_exposition_includes_http_series() {
        let t = test_app(MockVisionProvider::new(), Some(SECRET), true);

        // generate some traffic first
        send(&t.app, get_req("/health", None)).await;

        let response = t
            .app
            .clone()
            .oneshot(get_req("/metrics", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("http_requests_total"));
        assert!(text.contains("endpoint=\"/health\""));
        assert!(text.contains("tool=\"test\""));
    }
}
