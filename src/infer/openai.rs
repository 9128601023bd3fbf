use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Response parsing failed: {0}")]
    ParseFailed(#[from] serde_json::Error),

    #[error("Error response from API ({status}): {body}")]
    ErrorResponse { status: u16, body: Box<str> },
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage<'a>],
    pub max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

pub async fn chat_completion(
    http: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    request: &ChatCompletionRequest<'_>,
) -> Result<Value, ApiError> {
    let response = http
        .post(format!("{}/chat/completions", base_url.trim_end_matches('/')))
        .bearer_auth(api_key)
        .json(request)
        .send()
        .await?;

    let status = response.status();
    let response_text = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::ErrorResponse {
            status: status.as_u16(),
            body: response_text.into(),
        });
    }

    Ok(serde_json::from_str(&response_text)?)
}
