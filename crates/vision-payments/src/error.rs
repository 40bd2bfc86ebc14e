//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment and ledger errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// SKU not present in the product catalog
    #[error("Invalid product: {0}")]
    UnknownProduct(String),

    /// SKU known but not mapped to a provider product id
    #[error("Product not configured with payment provider: {0}")]
    NotProvisioned(String),

    /// Payment provider API error
    #[error("Payment provider error: {0}")]
    Provider(String),

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    Signature(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    Parse(String),

    /// Credit amount must be a positive integer
    #[error("Invalid credit amount: {0}")]
    InvalidAmount(u32),

    /// Checkout id already recorded
    #[error("Duplicate checkout: {0}")]
    DuplicateCheckout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PaymentError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::Provider(_) | PaymentError::Storage(_))
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            PaymentError::UnknownProduct(sku) => format!("Invalid product: {}", sku),
            PaymentError::NotProvisioned(_) => "Product not configured in Creem".into(),
            PaymentError::Provider(_) => "Payment processing failed. Please try again.".into(),
            PaymentError::Signature(_) => "Invalid signature".into(),
            PaymentError::Parse(_) => "Invalid webhook payload".into(),
            PaymentError::InvalidAmount(_) => "Credit amount must be a positive number.".into(),
            _ => "An error occurred processing your request.".into(),
        }
    }
}
