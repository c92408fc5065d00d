use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

use super::{build_http_client, validate_base_url, ChatClient, CompletionResponse};
use crate::llm::{LlmConfig, LlmType};
use crate::models::chat::ChatMessage;

/// Client for the `/v1/chat/completions` wire format. OpenAI, Groq, xAI and
/// DeepSeek all speak it; only the base URL differs.
pub struct OpenAIChatClient {
    http: HttpClient,
    llm_type: LlmType,
    base_url: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    n: u32,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIMessage>,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

impl OpenAIResponse {
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default()
    }
}

impl OpenAIChatClient {
    pub fn new(
        llm_type: LlmType,
        http: HttpClient,
        base_url: String,
    ) -> Self {
        Self {
            http,
            llm_type,
            base_url,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_key = config.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| format!("{} API key is required", config.llm_type))?;

        let base_url = validate_base_url(config.base_url())?;
        let http = build_http_client(Some(&api_key))?;

        Ok(Self::new(config.llm_type, http, base_url))
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let req = OpenAIChatRequest {
            model,
            messages,
            temperature,
            n: 1,
        };

        let resp = self.http.post(self.endpoint())
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json::<OpenAIResponse>()
            .await?;

        Ok(CompletionResponse { response: resp.into_text() })
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }

    fn get_llm_type(&self) -> LlmType {
        self.llm_type
    }
}
