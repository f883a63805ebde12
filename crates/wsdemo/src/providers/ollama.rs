use super::base::{Provider, Usage};
use super::configs::OllamaProviderConfig;
use super::errors::ProviderError;
use super::utils::{
    ensure_model, get_openai_usage, handle_response, messages_to_openai_spec,
    openai_response_to_message,
};
use crate::models::message::Message;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const OLLAMA_HOST: &str = "http://localhost:11434";
pub const OLLAMA_MODEL: &str = "qwen2.5";

/// Local models served by ollama through its openai compatible endpoint
pub struct OllamaProvider {
    client: Client,
    config: OllamaProviderConfig,
}

impl OllamaProvider {
    pub fn new(config: OllamaProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    async fn post(&self, model: &str, payload: Value) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self.client.post(&url).json(&payload).send().await?;
        handle_response(response, model).await
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn complete(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
    ) -> Result<(Message, Usage), ProviderError> {
        let model = ensure_model(model)?;

        let mut payload = json!({
            "model": model,
            "messages": messages_to_openai_spec(system, messages)
        });

        if let Some(temp) = self.config.temperature {
            payload["temperature"] = json!(temp);
        }
        if let Some(tokens) = self.config.max_tokens {
            payload["max_tokens"] = json!(tokens);
        }

        let response = self.post(model, payload).await?;

        let message = openai_response_to_message(&response)?;
        let usage = get_openai_usage(&response);

        Ok((message, usage))
    }
}
