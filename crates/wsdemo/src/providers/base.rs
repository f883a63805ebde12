use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::ProviderError;
use crate::models::message::Message;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// Base trait for AI providers (Gemini, OpenAI, etc)
#[async_trait]
pub trait Provider: Send + Sync {
    /// Model used when the caller does not ask for a specific one
    fn default_model(&self) -> &str;

    /// Generate the next assistant message for the conversation
    async fn complete(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
    ) -> Result<(Message, Usage), ProviderError>;
}
