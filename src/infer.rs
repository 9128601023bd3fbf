use async_trait::async_trait;
use serde_json::Value;

pub mod config;
mod normalize;
mod openai;

pub use normalize::{EMPTY_RESPONSE, UpstreamReply, normalize};
pub use openai::{ApiError, ChatCompletionRequest, ChatMessage, ROLE_SYSTEM, ROLE_USER};

pub const SYSTEM_PROMPT_TEXT: &str =
    "You are a helpful assistant for information security learning.";

/// Upstream chat completion. Returns the raw JSON body; shape detection is
/// left to [`normalize`].
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Value, ApiError>;
}

pub struct Client {
    http: reqwest::Client,
    base_url: Box<str>,
    api_key: Box<str>,
    model: Box<str>,
    system_prompt: Box<str>,
    max_output_tokens: u32,
}

impl Client {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            system_prompt: SYSTEM_PROMPT_TEXT.into(),
            max_output_tokens: 600,
        }
    }

    pub fn from_env() -> Self {
        Self::new(&config::UPSTREAM_BASE_URL, &config::PROXY_KEY, &config::UPSTREAM_MODEL)
            .with_max_output_tokens(*config::MAX_OUTPUT_TOKENS)
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: &str) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }
}

#[async_trait]
impl Completion for Client {
    async fn complete(&self, prompt: &str) -> Result<Value, ApiError> {
        let messages = [
            ChatMessage {
                role: ROLE_SYSTEM,
                content: &self.system_prompt,
            },
            ChatMessage {
                role: ROLE_USER,
                content: prompt,
            },
        ];
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: &messages,
            max_output_tokens: self.max_output_tokens,
        };

        tracing::debug!("Sending completion request for model {}", self.model);
        openai::chat_completion(&self.http, &self.base_url, &self.api_key, &request).await
    }
}
