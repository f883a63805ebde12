// Export route modules
pub mod chat;
pub mod prompts;

use crate::state::AppState;
use axum::Router;

// Function to configure all routes
pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(prompts::routes(state.clone()))
        .merge(chat::routes(state))
}
