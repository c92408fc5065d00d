pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use serde::Deserialize;
use std::error::Error as StdError;
use std::sync::Arc;
use super::{ LlmConfig, LlmType };
use self::ollama::OllamaClient;
use self::openai::OpenAIChatClient;
use crate::models::chat::ChatMessage;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub response: String,
}

/// A provider's "create completion" operation. One client serves every
/// model id the provider hosts; the model is chosen per call.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>>;

    fn get_base_url(&self) -> String;
    fn get_llm_type(&self) -> LlmType;
}

pub fn build_http_client(
    bearer: Option<&str>
) -> Result<reqwest::Client, Box<dyn StdError + Send + Sync>> {
    use reqwest::header::{ HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE };

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(key) = bearer {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| format!("Invalid API key format: {}", e))?
        );
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .build().map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)
}

pub fn validate_base_url(base_url: &str) -> Result<String, Box<dyn StdError + Send + Sync>> {
    let parsed = url::Url
        ::parse(base_url)
        .map_err(|e| format!("Invalid provider base URL '{}': {}", base_url, e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("Unsupported provider URL scheme '{}'", parsed.scheme()).into());
    }
    Ok(base_url.trim_end_matches('/').to_string())
}

pub fn new_client(
    config: &LlmConfig
) -> Result<Arc<dyn ChatClient>, Box<dyn StdError + Send + Sync>> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::Ollama => {
            let specific_client = OllamaClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::OpenAI | LlmType::DeepSeek | LlmType::XAI | LlmType::Groq => {
            let specific_client = OpenAIChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}
