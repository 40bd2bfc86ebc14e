//! # vision-core
//!
//! Core domain types for the Future Visualizer backend: the generated
//! vision structure with tolerant parsing, the supported language set,
//! prompt templates, and the provider abstraction.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Generation Gatekeeper                      │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │   Prompt    │  │   Vision    │  │   VisionProvider    │  │
//! │  │  Templates  │──│  (tolerant  │──│    (Strategy)       │  │
//! │  └─────────────┘  │   parse)    │  └─────────────────────┘  │
//! │                   └─────────────┘                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `VisionProvider` trait enables swapping the hosted LLM proxy for a
//! mock or any other backend without changing gatekeeper logic.

pub mod error;
pub mod language;
pub mod vision;
pub mod prompt;
pub mod provider;

pub use error::{Result, VisionError};
pub use language::Language;
pub use provider::VisionProvider;
pub use vision::{Section, Vision};
