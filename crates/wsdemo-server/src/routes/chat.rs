use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use wsdemo::{
    analysis::{split_reply, SplitResult},
    conversation::{Conversation, HistoryEntry},
};

// Types matching the incoming JSON structure
#[derive(Debug, Serialize, Deserialize)]
struct ChatRequest {
    system_prompt: String,
    system_prompt_filename: String,
    #[serde(default)]
    history: Vec<HistoryEntry>,
    user_message: String,
    #[serde(default)]
    model_name: Option<String>,
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<SplitResult>, ApiError> {
    let model = request
        .model_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| state.provider.default_model());

    let conversation = Conversation::assemble(
        &request.system_prompt,
        &request.system_prompt_filename,
        &request.history,
        &request.user_message,
    );

    tracing::info!(
        "Chat request: prompt={} model={} history={}",
        request.system_prompt_filename,
        model,
        request.history.len()
    );

    let (message, usage) = state
        .provider
        .complete(model, &conversation.system, &conversation.messages)
        .await?;

    tracing::debug!("Full model response:\n{}", message.text());
    tracing::debug!("Token usage: {:?}", usage);

    let split = split_reply(message.text());
    if split.has_analysis() {
        tracing::info!("Found analysis block in model response");
    } else {
        tracing::info!("No analysis block in model response");
    }
    tracing::debug!("Extracted analysis:\n{}", split.analysis);
    tracing::debug!("Cleaned reply:\n{}", split.reply);

    Ok(Json(split))
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .with_state(state)
}
