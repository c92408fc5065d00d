use serde::{ Serialize, Deserialize };
use serde_json::Value;

pub const DEFAULT_MODE: &str = "chat";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self { role: role.into(), content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

/// Body of `POST /api/chat`. Parsed leniently: anything missing or of the
/// wrong shape falls back to the defaults instead of rejecting the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub mode: String,
    pub messages: Vec<ChatMessage>,
}

impl Default for ChatRequest {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE.to_string(),
            messages: Vec::new(),
        }
    }
}

impl ChatRequest {
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::default(),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let mode = value
            .get("mode")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_MODE)
            .to_string();

        let messages = value
            .get("messages")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(message_from_value).collect())
            .unwrap_or_default();

        Self { mode, messages }
    }
}

fn message_from_value(value: &Value) -> ChatMessage {
    let field = |name: &str| value.get(name).and_then(Value::as_str).unwrap_or_default();
    ChatMessage::new(field("role"), field("content"))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
