//! Anthropic Messages API provider.
//!
//! One `POST {base_url}/messages` per completion. The reply's first text
//! block is the payload; a reply without one is [`ProviderError::EmptyContent`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::factory::ProviderFactory;
use super::secrets::{ApiCredential, CredentialSource};
use super::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, Role,
    TokenUsage,
};
use crate::config::RuntimeConfig;

/// Environment variable consulted when the config has no `api_key`.
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const CREDENTIAL_NAME: &str = "Anthropic API key";

/// Client for the Anthropic Messages API.
pub struct AnthropicProvider {
    credential: ApiCredential,
    base_url: String,
    http: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            credential: ApiCredential::new(api_key, CredentialSource::Programmatic, CREDENTIAL_NAME),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Key from config or `ANTHROPIC_API_KEY`; endpoint from `base_url`.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, ProviderError> {
        let credential = ApiCredential::resolve(
            config.api_key.as_deref(),
            ANTHROPIC_API_KEY_ENV,
            CREDENTIAL_NAME,
        )?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("threatbrief/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        Ok(Self {
            credential,
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            http,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("base_url", &self.base_url)
            .field("credential", &self.credential)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl<'a> MessagesRequest<'a> {
    /// System messages move to the top-level `system` field.
    fn new(messages: Vec<ChatMessage>, config: &'a CompletionConfig) -> Self {
        let (system, conversation): (Vec<_>, Vec<_>) =
            messages.into_iter().partition(|m| m.role == Role::System);
        let system = (!system.is_empty()).then(|| {
            system
                .into_iter()
                .map(|m| m.content)
                .collect::<Vec<_>>()
                .join("\n\n")
        });

        Self {
            model: &config.model,
            max_tokens: config.max_tokens,
            system,
            messages: conversation,
            temperature: (config.temperature > 0.0).then_some(config.temperature),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

impl MessagesResponse {
    fn into_completion(self) -> Result<CompletionResponse, ProviderError> {
        let content = self
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or(ProviderError::EmptyContent)?;

        Ok(CompletionResponse {
            content,
            usage: TokenUsage {
                input_tokens: self.usage.input_tokens,
                output_tokens: self.usage.output_tokens,
            },
            model: self.model,
            stop_reason: self.stop_reason,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Map a non-success reply to [`ProviderError::ApiError`], keeping the
/// service's own message when the body carries one.
fn api_error(status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| "API request failed".to_string());
    ProviderError::ApiError {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = MessagesRequest::new(messages, config);

        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", self.credential.expose())
            .header("anthropic-version", API_VERSION)
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        response
            .json::<MessagesResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?
            .into_completion()
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Registers [`AnthropicProvider`] under `provider: anthropic`.
pub struct AnthropicProviderFactory;

impl ProviderFactory for AnthropicProviderFactory {
    fn provider_type(&self) -> &'static str {
        "anthropic"
    }

    fn validate_config(&self, config: &RuntimeConfig) -> Result<(), ProviderError> {
        ApiCredential::resolve(config.api_key.as_deref(), ANTHROPIC_API_KEY_ENV, CREDENTIAL_NAME)?;

        match config.base_url.as_deref() {
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => Err(
                ProviderError::NotConfigured(format!("base_url '{}' is not an http(s) URL", url)),
            ),
            _ => Ok(()),
        }
    }

    fn create(&self, config: &RuntimeConfig) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        Ok(Arc::new(AnthropicProvider::from_config(config)?))
    }

    fn description(&self) -> &'static str {
        "Anthropic Messages API"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed_config() -> RuntimeConfig {
        RuntimeConfig {
            api_key: Some("sk-ant-test".to_string()),
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn test_request_lifts_system_message() {
        let config = CompletionConfig::default();
        let request = MessagesRequest::new(
            vec![
                ChatMessage::system("You are an analyst."),
                ChatMessage::user("Analyze Acme"),
            ],
            &config,
        );
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["system"], "You are an analyst.");
        assert_eq!(body["model"], "claude-sonnet-4-20250514");
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_response_takes_first_text_block() {
        let reply: MessagesResponse = serde_json::from_str(
            r#"{"model": "m", "stop_reason": "end_turn",
                "content": [{"type": "tool_use", "id": "t"}, {"type": "text", "text": "{}"}],
                "usage": {"input_tokens": 3, "output_tokens": 4}}"#,
        )
        .unwrap();
        let completion = reply.into_completion().unwrap();
        assert_eq!(completion.content, "{}");
        assert_eq!(completion.usage.total(), 7);
    }

    #[test]
    fn test_response_without_text_is_empty_content() {
        let reply: MessagesResponse =
            serde_json::from_str(r#"{"model": "m", "stop_reason": null, "content": []}"#).unwrap();
        assert!(matches!(reply.into_completion(), Err(ProviderError::EmptyContent)));
    }

    #[test]
    fn test_api_error_message() {
        let err = api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"type": "error", "error": {"type": "authentication_error", "message": "invalid x-api-key"}}"#,
        );
        assert_eq!(err.to_string(), "service returned 401: invalid x-api-key");

        let err = api_error(StatusCode::BAD_GATEWAY, "<html></html>");
        assert_eq!(err.to_string(), "service returned 502: API request failed");
    }

    #[test]
    fn test_from_config() {
        let config = RuntimeConfig {
            base_url: Some("http://localhost:8080/v1".to_string()),
            ..keyed_config()
        };
        let provider = AnthropicProvider::from_config(&config).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:8080/v1");
        assert!(!format!("{:?}", provider).contains("sk-ant-test"));
    }

    #[test]
    fn test_factory_rejects_bad_base_url() {
        let config = RuntimeConfig {
            base_url: Some("localhost:8080".to_string()),
            ..keyed_config()
        };
        assert!(AnthropicProviderFactory.validate_config(&config).is_err());
        assert!(AnthropicProviderFactory.validate_config(&keyed_config()).is_ok());
    }
}
