use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::{Provider, Usage};
use super::configs::OpenAiProviderConfig;
use super::errors::ProviderError;
use super::utils::{
    ensure_model, get_openai_usage, handle_response, messages_to_openai_spec,
    openai_response_to_message,
};
use crate::models::message::Message;

pub const OPENAI_HOST: &str = "https://api.openai.com";
pub const OPENAI_MODEL: &str = "gpt-4o";

pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    async fn post(&self, api_key: &str, model: &str, payload: Value) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&payload)
            .send()
            .await?;

        handle_response(response, model).await
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn complete(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
    ) -> Result<(Message, Usage), ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ProviderError::MissingCredentials("openai"))?;
        let model = ensure_model(model)?;

        let mut payload = json!({
            "model": model,
            "messages": messages_to_openai_spec(system, messages)
        });

        // Add optional parameters
        if let Some(temp) = self.config.temperature {
            payload["temperature"] = json!(temp);
        }
        if let Some(tokens) = self.config.max_tokens {
            payload["max_tokens"] = json!(tokens);
        }

        let response = self.post(api_key, model, payload).await?;

        let message = openai_response_to_message(&response)?;
        let usage = get_openai_usage(&response);

        Ok((message, usage))
    }
}
