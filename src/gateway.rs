use crate::llm::chat::ChatClient;
use crate::models::chat::ChatMessage;
use log::{ info, warn };
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MODELS: [&str; 2] = ["gpt-4o", "gpt-3.5-turbo"];

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no generation models configured")]
    NoModels,
    #[error("all {attempts} model(s) failed, last was '{model}': {source}")]
    Exhausted {
        attempts: usize,
        model: String,
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Sends a composed prompt to an ordered list of models on one provider,
/// one at a time, and returns the first successful completion.
#[derive(Clone)]
pub struct Gateway {
    client: Arc<dyn ChatClient>,
    models: Vec<String>,
    temperature: f32,
    attempt_timeout: Option<Duration>,
}

impl Gateway {
    pub fn new(client: Arc<dyn ChatClient>, models: Vec<String>) -> Self {
        Self {
            client,
            models,
            temperature: DEFAULT_TEMPERATURE,
            attempt_timeout: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        let mut last_failure = None;

        for (index, model) in self.models.iter().enumerate() {
            let tier = if index == 0 { "primary" } else { "fallback" };
            match self.attempt(model, messages).await {
                Ok(text) => {
                    if index > 0 {
                        info!("Fallback model '{}' answered after {} failure(s)", model, index);
                    }
                    return Ok(text);
                }
                Err(e) => {
                    warn!("{} model '{}' failed: {}", tier, model, e);
                    last_failure = Some((model.clone(), e));
                }
            }
        }

        match last_failure {
            Some((model, source)) =>
                Err(GatewayError::Exhausted {
                    attempts: self.models.len(),
                    model,
                    source,
                }),
            None => Err(GatewayError::NoModels),
        }
    }

    async fn attempt(
        &self,
        model: &str,
        messages: &[ChatMessage]
    ) -> Result<String, Box<dyn StdError + Send + Sync>> {
        let call = self.client.complete(model, messages, self.temperature);
        let completion = match self.attempt_timeout {
            Some(limit) =>
                tokio::time
                    ::timeout(limit, call).await
                    .map_err(|_| format!("timed out after {:?}", limit))??,
            None => call.await?,
        };
        Ok(completion.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::chat::CompletionResponse;
    use crate::llm::LlmType;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedClient {
        replies: HashMap<String, Result<String, String>>,
        calls: Mutex<Vec<String>>,
        stall: Option<String>,
    }

    impl ScriptedClient {
        fn reply(mut self, model: &str, reply: Result<&str, &str>) -> Self {
            self.replies.insert(
                model.to_string(),
                reply.map(str::to_string).map_err(str::to_string)
            );
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatClient for ScriptedClient {
        async fn complete(
            &self,
            model: &str,
            _messages: &[ChatMessage],
            temperature: f32
        ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
            assert_eq!(temperature, DEFAULT_TEMPERATURE);
            self.calls.lock().unwrap().push(model.to_string());
            if self.stall.as_deref() == Some(model) {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            match self.replies.get(model) {
                Some(Ok(text)) => Ok(CompletionResponse { response: text.clone() }),
                Some(Err(e)) => Err(e.clone().into()),
                None => Err(format!("unknown model {}", model).into()),
            }
        }

        fn get_base_url(&self) -> String {
            "scripted://".into()
        }

        fn get_llm_type(&self) -> LlmType {
            LlmType::OpenAI
        }
    }

    fn gateway(client: &Arc<ScriptedClient>) -> Gateway {
        let models = DEFAULT_MODELS.iter().map(|m| m.to_string()).collect();
        Gateway::new(client.clone(), models)
    }

    fn prompt() -> Vec<ChatMessage> {
        vec![ChatMessage::system("persona"), ChatMessage::new("user", "hi")]
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("gpt-4o", Ok("from primary"))
                .reply("gpt-3.5-turbo", Ok("from fallback"))
        );
        let text = gateway(&client).generate(&prompt()).await.unwrap();
        assert_eq!(text, "from primary");
        assert_eq!(client.calls(), vec!["gpt-4o"]);
    }

    #[tokio::test]
    async fn primary_failure_uses_fallback_once() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("gpt-4o", Err("401 unauthorized"))
                .reply("gpt-3.5-turbo", Ok("from fallback"))
        );
        let text = gateway(&client).generate(&prompt()).await.unwrap();
        assert_eq!(text, "from fallback");
        assert_eq!(client.calls(), vec!["gpt-4o", "gpt-3.5-turbo"]);
    }

    #[tokio::test]
    async fn empty_completion_is_success() {
        let client = Arc::new(ScriptedClient::default().reply("gpt-4o", Ok("")));
        assert_eq!(gateway(&client).generate(&prompt()).await.unwrap(), "");
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn both_failing_reports_last_error() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("gpt-4o", Err("primary down"))
                .reply("gpt-3.5-turbo", Err("fallback down"))
        );
        let err = gateway(&client).generate(&prompt()).await.unwrap_err();
        match err {
            GatewayError::Exhausted { attempts, model, source } => {
                assert_eq!(attempts, 2);
                assert_eq!(model, "gpt-3.5-turbo");
                assert_eq!(source.to_string(), "fallback down");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(client.calls(), vec!["gpt-4o", "gpt-3.5-turbo"]);
    }

    #[tokio::test]
    async fn extra_tiers_are_tried_in_order() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("a", Err("x"))
                .reply("b", Err("y"))
                .reply("c", Ok("third time"))
        );
        let gateway = Gateway::new(client.clone(), vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(gateway.generate(&prompt()).await.unwrap(), "third time");
        assert_eq!(client.calls(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn no_models_is_an_error() {
        let client = Arc::new(ScriptedClient::default());
        let gateway = Gateway::new(client.clone(), Vec::new());
        assert!(matches!(gateway.generate(&prompt()).await, Err(GatewayError::NoModels)));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn stalled_primary_falls_back_after_timeout() {
        let mut scripted = ScriptedClient::default()
            .reply("gpt-4o", Ok("too late"))
            .reply("gpt-3.5-turbo", Ok("from fallback"));
        scripted.stall = Some("gpt-4o".into());
        let client = Arc::new(scripted);

        let gateway = gateway(&client).with_attempt_timeout(Some(Duration::from_millis(20)));
        assert_eq!(gateway.generate(&prompt()).await.unwrap(), "from fallback");
        assert_eq!(client.calls(), vec!["gpt-4o", "gpt-3.5-turbo"]);
    }
}
