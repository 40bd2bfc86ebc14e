//! Vision Provider Strategy Pattern
//!
//! Defines the one interface the gatekeeper uses to reach a generation
//! backend, so the hosted LLM proxy can be swapped for a mock (or another
//! provider) without touching orchestration logic.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vision_core::{Language, VisionProvider};
//!
//! let provider = LlmProxyProvider::new(config);
//! let vision = provider.generate("iPhone", Language::En).await?;
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::language::Language;
use crate::vision::Vision;

/// Strategy trait for generation backends
///
/// Implement this trait to add a new backend. The gatekeeper works
/// exclusively through this interface.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name for logs and diagnostics
    fn name(&self) -> &str;

    /// Check if the provider is reachable and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Generate a future vision for a concept in the requested language
    async fn generate(&self, concept: &str, language: Language) -> Result<Vision>;
}
