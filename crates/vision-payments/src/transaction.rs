//! Payment Transactions
//!
//! A pending transaction row is written when a checkout session is created
//! and flipped to completed exactly once when the provider's webhook
//! confirms payment. The row snapshots the catalog at purchase time so a
//! later price change can never alter what an in-flight checkout grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use crate::catalog::Product;
use crate::error::{PaymentError, Result};

/// Lifecycle of a checkout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Checkout created, payment not yet confirmed
    Pending,
    /// Payment confirmed and tokens credited
    Completed,
}

impl TransactionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One checkout, keyed by the provider's checkout id
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentTransaction {
    /// Provider-issued checkout session id
    pub checkout_id: String,

    /// Device that initiated the purchase
    pub device_id: String,

    /// Catalog SKU purchased
    pub product_sku: String,

    /// Price snapshot in minor units
    pub amount_cents: u32,

    /// ISO currency code snapshot
    pub currency: String,

    /// Token grant snapshot
    pub tokens_granted: u32,

    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PaymentTransaction {
    /// Pending row snapshotting the catalog entry at purchase time
    pub fn pending(
        checkout_id: impl Into<String>,
        device_id: impl Into<String>,
        product: &Product,
    ) -> Self {
        Self {
            checkout_id: checkout_id.into(),
            device_id: device_id.into(),
            product_sku: product.sku.to_string(),
            amount_cents: product.price_cents,
            currency: crate::catalog::CURRENCY.to_string(),
            tokens_granted: product.tokens,
            status: TransactionStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// Transaction storage trait
pub trait TransactionStore: Send + Sync {
    /// Insert a pending row. A second insert for the same checkout id fails.
    fn insert(&self, transaction: PaymentTransaction) -> Result<()>;

    /// Fetch a row by checkout id
    fn get(&self, checkout_id: &str) -> Result<Option<PaymentTransaction>>;

    /// Flip a pending row to completed and return its snapshot.
    ///
    /// The check and the flip happen under one write guard, so of any
    /// number of concurrent claims for the same checkout exactly one gets
    /// the snapshot; the rest (and any redelivery) get `None`.
    fn claim_pending(&self, checkout_id: &str) -> Result<Option<PaymentTransaction>>;
}

/// In-memory transaction store
pub struct MemoryTransactionStore {
    transactions: RwLock<HashMap<String, PaymentTransaction>>,
}

impl Default for MemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self {
            transactions: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionStore for MemoryTransactionStore {
    fn insert(&self, transaction: PaymentTransaction) -> Result<()> {
        let mut transactions = self.transactions.write().unwrap();
        if transactions.contains_key(&transaction.checkout_id) {
            return Err(PaymentError::DuplicateCheckout(transaction.checkout_id));
        }
        transactions.insert(transaction.checkout_id.clone(), transaction);
        Ok(())
    }

    fn get(&self, checkout_id: &str) -> Result<Option<PaymentTransaction>> {
        let transactions = self.transactions.read().unwrap();
        Ok(transactions.get(checkout_id).cloned())
    }

    fn claim_pending(&self, checkout_id: &str) -> Result<Option<PaymentTransaction>> {
        let mut transactions = self.transactions.write().unwrap();
        match transactions.get_mut(checkout_id) {
            Some(transaction) if transaction.status == TransactionStatus::Pending => {
                transaction.status = TransactionStatus::Completed;
                transaction.completed_at = Some(Utc::now());
                Ok(Some(transaction.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use std::sync::Arc;

    fn pending_row(checkout_id: &str) -> PaymentTransaction {
        let product = catalog::find("standard").unwrap();
        PaymentTransaction::pending(checkout_id, "dev-1", product)
    }

    #[test]
    fn test_pending_row_snapshots_the_catalog() {
        let row = pending_row("co_123");

        assert_eq!(row.checkout_id, "co_123");
        assert_eq!(row.device_id, "dev-1");
        assert_eq!(row.product_sku, "standard");
        assert_eq!(row.amount_cents, 999);
        assert_eq!(row.currency, "USD");
        assert_eq!(row.tokens_granted, 15);
        assert_eq!(row.status, TransactionStatus::Pending);
        assert!(row.completed_at.is_none());
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let store = MemoryTransactionStore::new();
        store.insert(pending_row("co_123")).unwrap();

        let err = store.insert(pending_row("co_123")).unwrap_err();
        assert!(matches!(err, PaymentError::DuplicateCheckout(id) if id == "co_123"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_claim_flips_to_completed_exactly_once() {
        let store = MemoryTransactionStore::new();
        store.insert(pending_row("co_123")).unwrap();

        let claimed = store.claim_pending("co_123").unwrap().unwrap();
        assert_eq!(claimed.status, TransactionStatus::Completed);
        assert!(claimed.completed_at.is_some());
        assert_eq!(claimed.tokens_granted, 15);

        // Redelivery finds the row already completed
        assert!(store.claim_pending("co_123").unwrap().is_none());
        let row = store.get("co_123").unwrap().unwrap();
        assert_eq!(row.status, TransactionStatus::Completed);
    }

    #[test]
    fn test_claim_of_unknown_checkout_is_none() {
        let store = MemoryTransactionStore::new();
        assert!(store.claim_pending("co_missing").unwrap().is_none());
        assert!(store.get("co_missing").unwrap().is_none());
    }

    #[test]
    fn test_concurrent_claims_yield_one_winner() {
        let store = Arc::new(MemoryTransactionStore::new());
        store.insert(pending_row("co_race")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.claim_pending("co_race").unwrap().is_some())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(TransactionStatus::Completed.to_string(), "completed");
    }
}
