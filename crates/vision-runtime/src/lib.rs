//! # vision-runtime
//!
//! Concrete generation providers for the Future Visualizer backend.
//!
//! ## Providers
//!
//! - **LlmProxy** (default): OpenAI-compatible chat-completions proxy
//! - **Mock**: canned visions for tests and keyless local runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vision_runtime::LlmProxyProvider;
//!
//! let provider = LlmProxyProvider::from_env();
//! let vision = provider.generate("iPhone", Language::En).await?;
//! ```

pub mod mock;
pub mod proxy;

pub use mock::MockVisionProvider;
pub use proxy::{LlmProxyProvider, ProxyConfig};

// Re-export core types for convenience
pub use vision_core::{Language, Result, Vision, VisionError, VisionProvider};
