//! Process Configuration
//!
//! One validated `Settings` built from the environment at startup and
//! handed to every component that needs it. A malformed
//! `CREEM_PRODUCT_IDS` fails startup loudly; an absent one just means no
//! products are provisioned yet.

use std::collections::HashMap;

use anyhow::{bail, Context};

use vision_payments::{CheckoutUrls, CreemConfig};
use vision_runtime::ProxyConfig;

/// Application settings, loaded once in `main`
#[derive(Clone, Debug)]
pub struct Settings {
    /// Listen address
    pub bind_addr: String,

    /// Constant `tool` label on every exported metric
    pub tool_name: String,

    /// Generation proxy configuration
    pub proxy: ProxyConfig,

    /// Payment provider configuration
    pub creem: CreemConfig,

    /// Webhook signing secret; absent means permissive mode
    pub webhook_secret: Option<String>,

    /// Catalog SKU to provider-side product id
    pub product_ids: HashMap<String, String>,

    /// Default post-checkout redirect URLs
    pub checkout_urls: CheckoutUrls,
}

impl Settings {
    /// Load and validate settings from the environment
    pub fn from_env() -> anyhow::Result<Self> {
        let product_ids = match env_opt("CREEM_PRODUCT_IDS") {
            Some(raw) => parse_product_ids(&raw)
                .context("CREEM_PRODUCT_IDS must be a JSON object of sku -> product id")?,
            None => HashMap::new(),
        };

        let defaults = CheckoutUrls::default();
        let checkout_urls = CheckoutUrls {
            success_url: env_opt("CHECKOUT_SUCCESS_URL").unwrap_or(defaults.success_url),
            cancel_url: env_opt("CHECKOUT_CANCEL_URL").unwrap_or(defaults.cancel_url),
        };

        Ok(Self {
            bind_addr: env_opt("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            tool_name: env_opt("TOOL_NAME").unwrap_or_else(|| "future-visualizer".into()),
            proxy: ProxyConfig::from_env(),
            creem: CreemConfig::from_env(),
            webhook_secret: env_opt("CREEM_WEBHOOK_SECRET"),
            product_ids,
            checkout_urls,
        })
    }
}

/// Environment variable, with empty/whitespace values treated as unset
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse the SKU -> provider product id mapping
fn parse_product_ids(raw: &str) -> anyhow::Result<HashMap<String, String>> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let Some(object) = value.as_object() else {
        bail!("expected a JSON object, got {}", value);
    };

    let mut product_ids = HashMap::with_capacity(object.len());
    for (sku, id) in object {
        let Some(id) = id.as_str() else {
            bail!("product id for '{}' must be a string", sku);
        };
        product_ids.insert(sku.clone(), id.to_string());
    }
    Ok(product_ids)
}
