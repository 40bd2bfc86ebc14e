//! Error Types

use thiserror::Error;

/// Result type alias for vision operations
pub type Result<T> = std::result::Result<T, VisionError>;

/// Vision generation error types
#[derive(Error, Debug)]
pub enum VisionError {
    /// Generation provider returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Provider reply could not be interpreted at all
    #[error("Parse error: {0}")]
    Parse(String),

    /// Language outside the supported set
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl VisionError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, VisionError::ProviderUnavailable(_))
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            VisionError::Provider(msg) => format!("The AI service encountered an error: {}", msg),
            VisionError::ProviderUnavailable(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            VisionError::Parse(_) => "The AI service returned an unreadable response.".into(),
            VisionError::UnsupportedLanguage(lang) => {
                format!("The language '{}' is not supported.", lang)
            }
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for VisionError {
    fn from(err: anyhow::Error) -> Self {
        VisionError::Other(err.to_string())
    }
}
