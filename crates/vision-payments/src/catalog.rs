//! Product Catalog
//!
//! The fixed three-tier token bundles clients can buy. Price and token
//! count are snapshotted into each `PaymentTransaction` at checkout time.
//! The SKU to provider-product-id mapping lives in configuration, not here.

use serde::Serialize;

/// Catalog currency; amounts are integer cents throughout
pub const CURRENCY: &str = "USD";

/// One purchasable token bundle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Catalog key, stable across deployments
    pub sku: &'static str,

    /// Generation tokens granted on completed checkout
    pub tokens: u32,

    /// Price in USD cents
    pub price_cents: u32,
}

/// Every bundle on sale
pub const PRODUCTS: [Product; 3] = [
    Product {
        sku: "starter",
        tokens: 5,
        price_cents: 499,
    },
    Product {
        sku: "standard",
        tokens: 15,
        price_cents: 999,
    },
    Product {
        sku: "pro",
        tokens: 50,
        price_cents: 2499,
    },
];

/// Look up a bundle by SKU (exact match)
pub fn find(sku: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|product| product.sku == sku)
}
