//! Token Ledger
//!
//! Owns the per-device balance record and the atomic check/consume/credit
//! operations everything else builds on. A device gets one free trial
//! generation, burned before any paid token; paid tokens arrive only via
//! `credit` (completed checkouts and compensating refunds).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{PaymentError, Result};

/// Per-device balance record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenAccount {
    /// Opaque client-supplied device identifier
    pub device_id: String,

    /// Current balance; never negative
    pub tokens_remaining: u32,

    /// Lifetime tokens credited (audit only, never decremented)
    pub tokens_purchased: u32,

    /// One-way flag: set by the first successful consume, never reset
    pub free_trial_used: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl TokenAccount {
    /// Fresh zero-balance record with the trial unused
    pub fn new(device_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            device_id: device_id.into(),
            tokens_remaining: 0,
            tokens_purchased: 0,
            free_trial_used: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Outcome of a permission check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationAllowance {
    /// Whether the device may generate right now
    pub allowed: bool,

    /// True when the allowance is the unused free trial
    pub free_trial: bool,

    /// Paid balance at check time (0 when not allowed)
    pub remaining: u32,
}

/// Outcome of a consume attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsumeOutcome {
    /// Whether an entitlement was spent
    pub consumed: bool,

    /// Paid balance after the attempt (0 on failure)
    pub remaining: u32,
}

/// Client-facing status projection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenStatus {
    pub device_id: String,
    pub tokens_remaining: u32,
    pub tokens_purchased: u32,
    pub free_trial_used: bool,
    pub free_trial_available: bool,
}

/// Token ledger storage trait
pub trait TokenStore: Send + Sync {
    /// Fetch the record for a device, lazily inserting a fresh one.
    /// Concurrent first access for the same device never creates two rows.
    fn get_or_create(&self, device_id: &str) -> Result<TokenAccount>;

    /// Check whether the device may generate right now.
    ///
    /// Advisory only: `consume` re-checks under its own write guard, so a
    /// race between check and consume surfaces as a failed consume rather
    /// than an overdraw.
    fn can_generate(&self, device_id: &str) -> Result<GenerationAllowance>;

    /// Spend one generation: the unused free trial if present, otherwise
    /// one paid token. Check and mutation happen under one write guard.
    fn consume(&self, device_id: &str) -> Result<ConsumeOutcome>;

    /// Add `amount` tokens (positive) to the balance and the lifetime
    /// counter; the trial flag is never touched. Returns the new balance.
    fn credit(&self, device_id: &str, amount: u32) -> Result<u32>;

    /// Status projection; creates the record like any other first touch
    fn status(&self, device_id: &str) -> Result<TokenStatus>;
}

/// In-memory token store
///
/// The write lock is the single-writer serialization point: every
/// read-modify-write runs under one guard, so a decision can never go
/// stale before it is applied.
pub struct MemoryTokenStore {
    accounts: RwLock<HashMap<String, TokenAccount>>,
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_or_create(&self, device_id: &str) -> Result<TokenAccount> {
        let mut accounts = self.accounts.write().unwrap();
        let account = accounts
            .entry(device_id.to_string())
            .or_insert_with(|| TokenAccount::new(device_id));
        Ok(account.clone())
    }

    fn can_generate(&self, device_id: &str) -> Result<GenerationAllowance> {
        let account = self.get_or_create(device_id)?;

        if !account.free_trial_used {
            return Ok(GenerationAllowance {
                allowed: true,
                free_trial: true,
                remaining: account.tokens_remaining,
            });
        }

        if account.tokens_remaining > 0 {
            return Ok(GenerationAllowance {
                allowed: true,
                free_trial: false,
                remaining: account.tokens_remaining,
            });
        }

        Ok(GenerationAllowance {
            allowed: false,
            free_trial: false,
            remaining: 0,
        })
    }

    fn consume(&self, device_id: &str) -> Result<ConsumeOutcome> {
        let mut accounts = self.accounts.write().unwrap();
        let account = accounts
            .entry(device_id.to_string())
            .or_insert_with(|| TokenAccount::new(device_id));

        // Trial burns before any paid token
        if !account.free_trial_used {
            account.free_trial_used = true;
            account.updated_at = Utc::now();
            return Ok(ConsumeOutcome {
                consumed: true,
                remaining: account.tokens_remaining,
            });
        }

        if account.tokens_remaining > 0 {
            account.tokens_remaining -= 1;
            account.updated_at = Utc::now();
            return Ok(ConsumeOutcome {
                consumed: true,
                remaining: account.tokens_remaining,
            });
        }

        Ok(ConsumeOutcome {
            consumed: false,
            remaining: 0,
        })
    }

    fn credit(&self, device_id: &str, amount: u32) -> Result<u32> {
        if amount == 0 {
            return Err(PaymentError::InvalidAmount(amount));
        }

        let mut accounts = self.accounts.write().unwrap();
        let account = accounts
            .entry(device_id.to_string())
            .or_insert_with(|| TokenAccount::new(device_id));

        account.tokens_remaining += amount;
        account.tokens_purchased += amount;
        account.updated_at = Utc::now();

        Ok(account.tokens_remaining)
    }

    fn status(&self, device_id: &str) -> Result<TokenStatus> {
        let account = self.get_or_create(device_id)?;
        Ok(TokenStatus {
            device_id: account.device_id,
            tokens_remaining: account.tokens_remaining,
            tokens_purchased: account.tokens_purchased,
            free_trial_used: account.free_trial_used,
            free_trial_available: !account.free_trial_used,
        })
    }
}
