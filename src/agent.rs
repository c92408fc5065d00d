use crate::cli::Args;
use crate::config::prompt::{ self, PromptConfig };
use crate::gateway::{ Gateway, GatewayError };
use crate::llm::LlmConfig;
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::models::chat::ChatRequest;

use log::{ debug, info };
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

/// Per-process state behind the chat endpoint: the prompt table and the
/// gateway to the provider. Immutable once built, shared across requests.
#[derive(Clone)]
pub struct AIAgent {
    prompt_config: Arc<PromptConfig>,
    gateway: Gateway,
}

impl AIAgent {
    pub fn new(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let chat_client = Self::initialize_chat_client(args)?;
        let prompt_config = prompt::load_prompts_or_builtin(args.prompts_path.as_deref())?;

        let models = args.model_list();
        if models.is_empty() {
            return Err("At least one chat model must be configured (CHAT_MODELS)".into());
        }

        let gateway = Gateway::new(chat_client, models)
            .with_temperature(args.temperature)
            .with_attempt_timeout(args.provider_timeout_secs.map(Duration::from_secs));

        Ok(Self::from_parts(prompt_config, gateway))
    }

    pub fn from_parts(prompt_config: Arc<PromptConfig>, gateway: Gateway) -> Self {
        Self { prompt_config, gateway }
    }

    fn initialize_chat_client(
        args: &Args
    ) -> Result<Arc<dyn ChatClient>, Box<dyn Error + Send + Sync>> {
        let chat_api_key = if !args.chat_api_key.is_empty() {
            Some(args.chat_api_key.clone())
        } else {
            None
        };
        let chat_config = LlmConfig {
            llm_type: args.chat_llm_type.parse()?,
            base_url: args.chat_base_url.clone(),
            api_key: chat_api_key,
        };
        let chat_client = new_chat_client(&chat_config)?;
        info!(
            "Chat client configured: Type={}, Models={:?}, BaseURL={}",
            chat_config.llm_type,
            args.model_list(),
            chat_client.get_base_url()
        );
        Ok(chat_client)
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub async fn respond(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        let messages = self.prompt_config.compose(&request.mode, &request.messages);
        debug!(
            "Composed prompt for mode '{}' with {} message(s)",
            request.mode,
            messages.len()
        );
        self.gateway.generate(&messages).await
    }
}
