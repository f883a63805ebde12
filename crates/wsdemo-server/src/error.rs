use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wsdemo::{prompt_store::PromptError, providers::errors::ProviderError};

pub const ENV_PREFIX: &str = "WSDEMO";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {env_var}: {message}")]
    InvalidValue { env_var: String, message: String },

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Environment variable that sets a dotted configuration key, e.g. `server.port`
pub fn to_env_var(field_path: &str) -> String {
    format!(
        "{}_{}",
        ENV_PREFIX,
        field_path.to_uppercase().replace('.', "__")
    )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Failures surfaced by the http handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Provider(err) => match err {
                ProviderError::MissingCredentials(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ProviderError::UnknownModel(_) => StatusCode::BAD_REQUEST,
                ProviderError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                ProviderError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                ProviderError::Authentication(_)
                | ProviderError::Request(_)
                | ProviderError::Server { .. }
                | ProviderError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::BAD_GATEWAY,
            },
            ApiError::Prompt(err) => match err {
                PromptError::NotFound(_) => StatusCode::NOT_FOUND,
                PromptError::InvalidName(_) => StatusCode::BAD_REQUEST,
                PromptError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
