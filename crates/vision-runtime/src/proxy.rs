//! LLM Proxy Provider
//!
//! Implementation of `VisionProvider` against an OpenAI-compatible
//! chat-completions proxy. One request per generation, no streaming; the
//! proxy call is the dominant cost of a generation request and runs under
//! its own long timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vision_core::{
    error::{Result, VisionError},
    language::Language,
    prompt,
    provider::VisionProvider,
    vision::Vision,
};

/// Proxy provider configuration
#[derive(Clone, Debug)]
pub struct ProxyConfig {
    /// Proxy base URL
    pub base_url: String,

    /// Bearer API key
    pub api_key: String,

    /// Model name forwarded to the proxy
    pub model: String,

    /// Request timeout in seconds; generation is slow, keep this generous
    pub timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://llm-proxy.densematrix.ai".into(),
            api_key: String::new(),
            model: "gemini-2.5-flash".into(),
            timeout_secs: 120,
        }
    }
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("LLM_PROXY_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("LLM_PROXY_KEY").unwrap_or_default(),
            model: std::env::var("LLM_MODEL").unwrap_or(defaults.model),
            timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

/// Max completion tokens requested per generation
const MAX_TOKENS: u32 = 4000;

/// Sampling temperature; visions are supposed to be imaginative
const TEMPERATURE: f32 = 0.8;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// OpenAI-compatible chat-completions provider
pub struct LlmProxyProvider {
    client: reqwest::Client,
    config: ProxyConfig,
}

impl LlmProxyProvider {
    /// Create from configuration
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::new(ProxyConfig::from_env())
    }

    /// Whether an API key is configured
    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl VisionProvider for LlmProxyProvider {
    fn name(&self) -> &str {
        "LlmProxy"
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.url("/v1/models"))
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(10))
            .send()
            .await;

        match response {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("LLM proxy health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn generate(&self, concept: &str, language: Language) -> Result<Vision> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt::system_prompt(language),
                },
                ChatMessage {
                    role: "user",
                    content: prompt::user_prompt(concept),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(self.url("/v1/chat/completions"))
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| VisionError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Provider(format!(
                "LLM API error: {} - {}",
                status, body
            )));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| VisionError::Parse(format!("LLM response parse error: {}", e)))?;

        let content = reply
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| VisionError::Parse("LLM reply has no choices".into()))?;

        Ok(Vision::from_reply(concept, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.base_url, "https://llm-proxy.densematrix.ai");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_url_tolerates_trailing_slash() {
        let provider = LlmProxyProvider::new(ProxyConfig {
            base_url: "https://proxy.example.com/".into(),
            ..ProxyConfig::default()
        });
        assert_eq!(
            provider.url("/v1/chat/completions"),
            "https://proxy.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_unconfigured_without_key() {
        let provider = LlmProxyProvider::new(ProxyConfig::default());
        assert!(!provider.is_configured());

        let provider = LlmProxyProvider::new(ProxyConfig {
            api_key: "sk-test".into(),
            ..ProxyConfig::default()
        });
        assert!(provider.is_configured());
    }

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            model: "gemini-2.5-flash".into(),
            messages: vec![ChatMessage {
                role: "user",
                content: "hi".into(),
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gemini-2.5-flash");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 4000);
        assert!((value["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_chat_response_parses() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"title\": \"x\"}"}}
            ],
            "usage": {"total_tokens": 42}
        }"#;
        let reply: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply.choices[0].message.content, "{\"title\": \"x\"}");
    }
}
