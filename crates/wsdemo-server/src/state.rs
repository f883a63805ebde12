use std::sync::Arc;
use wsdemo::{prompt_store::PromptStore, providers::base::Provider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub prompts: Arc<PromptStore>,
}

impl AppState {
    pub fn new(provider: Arc<dyn Provider>, prompts: PromptStore) -> Self {
        Self {
            provider,
            prompts: Arc::new(prompts),
        }
    }
}
