//! Generation Gatekeeper
//!
//! Orchestrates one generation request: permission check, token consume,
//! the external generation call, and the compensating refund when that
//! call fails. The refund is deliberately a second ledger operation, not
//! a rollback: the consume has already committed by the time the external
//! call runs.

use std::sync::Arc;

use thiserror::Error;

use vision_core::{Language, Vision, VisionError, VisionProvider};
use vision_payments::{PaymentError, TokenStore};

use crate::metrics::Metrics;

/// Gatekeeper failure modes
#[derive(Error, Debug)]
pub enum GateError {
    /// No trial and no balance; pay to continue
    #[error("No tokens remaining. Please purchase more.")]
    PaymentRequired { remaining: u32 },

    /// Ledger storage failure
    #[error(transparent)]
    Ledger(#[from] PaymentError),

    /// The external generation call failed (after a refund was issued)
    #[error("Failed to generate vision: {0}")]
    Generation(VisionError),
}

/// A successful generation, with the entitlement that paid for it
#[derive(Clone, Debug)]
pub struct GenerationReply {
    pub vision: Vision,
    pub is_free_trial: bool,
    pub remaining_tokens: u32,
}

/// Generation gatekeeper
pub struct Gatekeeper {
    ledger: Arc<dyn TokenStore>,
    provider: Arc<dyn VisionProvider>,
    metrics: Arc<Metrics>,
}

impl Gatekeeper {
    pub fn new(
        ledger: Arc<dyn TokenStore>,
        provider: Arc<dyn VisionProvider>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            ledger,
            provider,
            metrics,
        }
    }

    /// Spend one entitlement and generate a vision.
    ///
    /// A consume that loses the race between check and apply surfaces as
    /// payment-required, never as an overdraw. A client that disconnects
    /// mid-generation keeps its token spent; only an explicit generation
    /// failure triggers the refund.
    pub async fn request_generation(
        &self,
        device_id: &str,
        concept: &str,
        language: Language,
    ) -> Result<GenerationReply, GateError> {
        let allowance = self.ledger.can_generate(device_id)?;
        if !allowance.allowed {
            return Err(GateError::PaymentRequired { remaining: 0 });
        }

        let outcome = self.ledger.consume(device_id)?;
        if !outcome.consumed {
            return Err(GateError::PaymentRequired { remaining: 0 });
        }

        self.metrics.core_function_calls.inc();
        if allowance.free_trial {
            self.metrics.free_trial_used.inc();
        } else {
            self.metrics.tokens_consumed.inc();
        }

        tracing::info!(
            device_id,
            concept,
            language = %language,
            free_trial = allowance.free_trial,
            remaining = outcome.remaining,
            "Generation permitted"
        );

        match self.provider.generate(concept, language).await {
            Ok(vision) => Ok(GenerationReply {
                vision,
                is_free_trial: allowance.free_trial,
                remaining_tokens: outcome.remaining,
            }),
            Err(err) => {
                // Compensating refund: always a plain token, even when the
                // trial was consumed. The trial flag stays set.
                match self.ledger.credit(device_id, 1) {
                    Ok(balance) => {
                        tracing::warn!(
                            device_id,
                            balance,
                            error = %err,
                            "Generation failed, token refunded"
                        );
                    }
                    Err(refund_err) => {
                        tracing::error!(
                            device_id,
                            error = %err,
                            refund_error = %refund_err,
                            "Generation failed and the refund failed too"
                        );
                    }
                }
                Err(GateError::Generation(err))
            }
        }
    }
}
