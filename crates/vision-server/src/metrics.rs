//! Prometheus Metrics
//!
//! One registry per process, every series carrying a constant `tool`
//! label so multiple tools can share one scrape target. HTTP series are
//! recorded by the [`track`] middleware, which also counts known search
//! and social crawlers by user agent.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::state::AppState;

/// User-agent substrings counted as crawler visits
const BOT_PATTERNS: [&str; 8] = [
    "Googlebot",
    "bingbot",
    "Baiduspider",
    "YandexBot",
    "DuckDuckBot",
    "Slurp",
    "facebookexternalhit",
    "Twitterbot",
];

/// Process-wide metric set
pub struct Metrics {
    registry: Registry,

    /// Requests by endpoint/method/status
    pub http_requests: IntCounterVec,

    /// Request latency by endpoint/method
    pub http_request_duration: HistogramVec,

    /// Generation (visualize) calls that passed the gate
    pub core_function_calls: IntCounter,

    /// Paid tokens consumed
    pub tokens_consumed: IntCounter,

    /// Free trials consumed
    pub free_trial_used: IntCounter,

    /// Completed payments by SKU
    pub payment_success: IntCounterVec,

    /// Revenue in cents from completed payments
    pub payment_revenue_cents: IntCounter,

    /// Crawler visits by bot name
    pub crawler_visits: IntCounterVec,
}

impl Metrics {
    pub fn new(tool_name: &str) -> prometheus::Result<Self> {
        let opts = |name: &str, help: &str| Opts::new(name, help).const_label("tool", tool_name);

        let http_requests = IntCounterVec::new(
            opts("http_requests_total", "Total HTTP requests"),
            &["endpoint", "method", "status"],
        )?;
        let http_request_duration = HistogramVec::new(
            HistogramOpts::from(opts("http_request_duration_seconds", "HTTP request duration")),
            &["endpoint", "method"],
        )?;
        let core_function_calls = IntCounter::with_opts(opts(
            "core_function_calls_total",
            "Core function (visualize) calls",
        ))?;
        let tokens_consumed =
            IntCounter::with_opts(opts("tokens_consumed_total", "Tokens consumed"))?;
        let free_trial_used =
            IntCounter::with_opts(opts("free_trial_used_total", "Free trials used"))?;
        let payment_success = IntCounterVec::new(
            opts("payment_success_total", "Successful payments"),
            &["product_sku"],
        )?;
        let payment_revenue_cents = IntCounter::with_opts(opts(
            "payment_revenue_cents_total",
            "Total revenue in cents",
        ))?;
        let crawler_visits =
            IntCounterVec::new(opts("crawler_visits_total", "Crawler visits"), &["bot"])?;

        let registry = Registry::new();
        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(core_function_calls.clone()))?;
        registry.register(Box::new(tokens_consumed.clone()))?;
        registry.register(Box::new(free_trial_used.clone()))?;
        registry.register(Box::new(payment_success.clone()))?;
        registry.register(Box::new(payment_revenue_cents.clone()))?;
        registry.register(Box::new(crawler_visits.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            http_request_duration,
            core_function_calls,
            tokens_consumed,
            free_trial_used,
            payment_success,
            payment_revenue_cents,
            crawler_visits,
        })
    }

    /// Text exposition of every registered series
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::error!("Metrics encoding failed: {}", e);
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// First bot pattern matching the user agent, if any
fn detect_crawler(user_agent: &str) -> Option<&'static str> {
    let user_agent = user_agent.to_lowercase();
    BOT_PATTERNS
        .into_iter()
        .find(|bot| user_agent.contains(&bot.to_lowercase()))
}

/// Request-tracking middleware: HTTP counters, latency, crawler visits
pub async fn track(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = request.uri().path().to_string();
    let method = request.method().to_string();

    if let Some(bot) = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .and_then(detect_crawler)
    {
        state.metrics.crawler_visits.with_label_values(&[bot]).inc();
    }

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    state
        .metrics
        .http_requests
        .with_label_values(&[&endpoint, &method, &status])
        .inc();
    state
        .metrics
        .http_request_duration
        .with_label_values(&[&endpoint, &method])
        .observe(start.elapsed().as_secs_f64());

    response
}
