use axum::body::Bytes;
use serde::{Deserialize, Serialize};

pub const PROXY_ERROR: &str = "proxy_error";

/// Incoming chat message, from either a JSON or a multipart body.
#[derive(Debug, Default)]
pub struct ChatRequest {
    pub text: Option<Box<str>>,
    pub image: Option<Bytes>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JsonChatRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl From<JsonChatRequest> for ChatRequest {
    fn from(request: JsonChatRequest) -> Self {
        Self {
            text: request.text.map(String::into_boxed_str),
            image: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Box<str>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Box<str>>,
}

impl ChatResponse {
    pub fn success(text: Box<str>) -> Self {
        Self {
            ok: true,
            text: Some(text),
            error: None,
        }
    }

    pub fn failure() -> Self {
        Self {
            ok: false,
            text: None,
            error: Some(PROXY_ERROR.into()),
        }
    }
}
