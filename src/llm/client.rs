//! OpenAI-compatible LLM client.
//!
//! This client works with any OpenAI-compatible chat-completions endpoint,
//! Groq's included.

use crate::config::LlmConfig;
use crate::error::{RecommenderError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Model every completion is requested from.
pub const MODEL: &str = "llama3-70b-8192";

/// Sampling temperature sent with every completion.
pub const TEMPERATURE: f32 = 0.7;

/// Message role in a conversation. Only user turns are ever sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request body for chat completion.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: &'static str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

/// Response from chat completion.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenAI API error response.
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// What the model sent back for one prompt.
///
/// Most responses carry completion text. When the first choice has no
/// message content the whole response body is kept so it can still be shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Text(String),
    Raw(serde_json::Value),
}

impl Completion {
    /// The completion text, if the response had one.
    pub fn text(&self) -> Option<&str> {
        match self {
            Completion::Text(text) => Some(text),
            Completion::Raw(_) => None,
        }
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Text(text) => f.write_str(text),
            Completion::Raw(value) => match serde_json::to_string_pretty(value) {
                Ok(json) => f.write_str(&json),
                Err(_) => write!(f, "{}", value),
            },
        }
    }
}

/// Response from an LLM call including metadata.
#[derive(Debug)]
pub struct LlmResponse {
    /// The generated completion.
    pub completion: Completion,
    /// Reason the model stopped generating.
    pub finish_reason: Option<String>,
    /// Token usage (if available).
    pub usage: Option<TokenUsage>,
}

#[derive(Debug)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A text-completion model: one prompt in, one completion out.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion>;
}

/// OpenAI-compatible LLM client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// The model identifier requests are sent with.
    pub fn model(&self) -> &str {
        MODEL
    }

    /// Get the API endpoint URL.
    fn endpoint(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        format!("{}/v1/chat/completions", base)
    }

    /// Send a chat completion request.
    pub async fn chat(&self, messages: Vec<Message>) -> Result<LlmResponse> {
        let request = ChatCompletionRequest {
            model: MODEL,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: TEMPERATURE,
        };

        tracing::debug!(model = MODEL, endpoint = %self.endpoint(), "sending chat completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            if status == StatusCode::UNAUTHORIZED {
                return Err(RecommenderError::Authentication(message));
            }
            return Err(RecommenderError::LlmApi(format!(
                "Request failed ({}): {}",
                status, message
            )));
        }

        parse_completion_body(&body)
    }

    /// Test connectivity to the API.
    pub async fn test_connection(&self) -> Result<()> {
        let completion = self
            .complete("Say 'hello' and nothing else.")
            .await?;

        match completion.text() {
            Some(text) if text.to_lowercase().contains("hello") => Ok(()),
            _ => Err(RecommenderError::LlmApi(format!(
                "Unexpected response: {}",
                completion
            ))),
        }
    }
}

#[async_trait]
impl CompletionModel for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<Completion> {
        let response = self.chat(vec![Message::user(prompt)]).await?;
        Ok(response.completion)
    }
}

/// Turn a successful response body into an [`LlmResponse`].
fn parse_completion_body(body: &str) -> Result<LlmResponse> {
    let raw: serde_json::Value = serde_json::from_str(body)?;
    let parsed: ChatCompletionResponse = serde_json::from_value(raw.clone())?;

    let usage = parsed.usage.map(|u| TokenUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    let Some(choice) = parsed.choices.into_iter().next() else {
        return Err(RecommenderError::LlmApi("No choices in response".to_string()));
    };

    let completion = match choice.message.and_then(|m| m.content) {
        Some(content) => Completion::Text(content),
        None => Completion::Raw(raw),
    };

    Ok(LlmResponse {
        completion,
        finish_reason: choice.finish_reason,
        usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, routing::post};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    fn config_for(api_base: &str) -> LlmConfig {
        LlmConfig {
            api_base: api_base.to_string(),
            api_key: "test".to_string(),
            ..Default::default()
        }
    }

    /// Serve a chat-completions stub that echoes the user message along
    /// with the model and temperature it was sent with.
    async fn spawn_echo_server() -> String {
        async fn echo(Json(body): Json<Value>) -> Json<Value> {
            let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
            let content = format!(
                "{} [{} t={} role={}] -- ECHO",
                prompt,
                body["model"].as_str().unwrap_or_default(),
                body["temperature"],
                body["messages"][0]["role"].as_str().unwrap_or_default(),
            );
            Json(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7}
            }))
        }

        let app = Router::new().route("/v1/chat/completions", post(echo));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_message_serializes_user_role() {
        let user = serde_json::to_value(Message::user("Hello!")).unwrap();
        assert_eq!(user, json!({"role": "user", "content": "Hello!"}));
    }

    #[test]
    fn test_endpoint_construction() {
        let client = LlmClient::new(config_for("https://api.groq.com/openai/")).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );

        let client2 = LlmClient::new(config_for("https://api.groq.com/openai")).unwrap();
        assert_eq!(
            client2.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_parse_text_completion() {
        let body = r#"{"choices":[{"message":{"content":"1. Song"},"finish_reason":"stop"}]}"#;
        let response = parse_completion_body(body).unwrap();
        assert_eq!(response.completion, Completion::Text("1. Song".to_string()));
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_parse_missing_content_keeps_raw_body() {
        let body = r#"{"id":"abc","choices":[{"message":{"role":"assistant"}}]}"#;
        let response = parse_completion_body(body).unwrap();
        match response.completion {
            Completion::Raw(value) => assert_eq!(value["id"], "abc"),
            other => panic!("expected raw completion, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_no_choices_is_error() {
        let body = r#"{"choices":[]}"#;
        assert!(matches!(
            parse_completion_body(body),
            Err(RecommenderError::LlmApi(_))
        ));
    }

    #[test]
    fn test_completion_display() {
        assert_eq!(Completion::Text("hi".to_string()).to_string(), "hi");
        let raw = Completion::Raw(json!({"id": "x"}));
        assert!(raw.to_string().contains("\"id\": \"x\""));
        assert!(raw.text().is_none());
    }

    #[tokio::test]
    async fn test_complete_against_echo_server() {
        let base = spawn_echo_server().await;
        let client = LlmClient::new(config_for(&base)).unwrap();

        let response = client.chat(vec![Message::user("ping")]).await.unwrap();
        assert_eq!(
            response.completion.text(),
            Some("ping [llama3-70b-8192 t=0.7 role=user] -- ECHO")
        );
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(7));
    }

    #[tokio::test]
    async fn test_complete_sends_fixed_model_and_temperature() {
        let base = spawn_echo_server().await;
        let config = LlmConfig {
            max_tokens: 64,
            ..config_for(&base)
        };
        let client = LlmClient::new(config).unwrap();

        let completion = client.complete("I like X").await.unwrap();
        let text = completion.text().unwrap();
        assert!(text.starts_with("I like X"));
        assert!(text.contains(&format!("{} t={}", MODEL, TEMPERATURE)));
        assert_eq!(client.model(), "llama3-70b-8192");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_error() {
        async fn reject() -> (axum::http::StatusCode, Json<Value>) {
            (
                axum::http::StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"message": "Invalid API Key", "type": "invalid_request_error"}})),
            )
        }

        let app = Router::new().route("/v1/chat/completions", post(reject));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = LlmClient::new(config_for(&format!("http://{}", addr))).unwrap();
        let err = client.complete("hello").await.unwrap_err();
        match err {
            RecommenderError::Authentication(message) => assert_eq!(message, "Invalid API Key"),
            other => panic!("expected authentication error, got {:?}", other),
        }
    }
}
