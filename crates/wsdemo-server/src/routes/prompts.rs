use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct PromptContentResponse {
    content: String,
}

async fn list_prompts(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let prompts = state.prompts.list()?;
    tracing::debug!("Listing {} prompts from {:?}", prompts.len(), state.prompts.dir());
    Ok(Json(prompts))
}

async fn get_prompt(
    State(state): State<AppState>,
    Path(prompt_name): Path<String>,
) -> Result<Json<PromptContentResponse>, ApiError> {
    let content = state.prompts.read(&prompt_name)?;
    Ok(Json(PromptContentResponse { content }))
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/prompts", get(list_prompts))
        .route("/api/prompts/:prompt_name", get(get_prompt))
        .with_state(state)
}
