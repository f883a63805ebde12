use thiserror::Error;

/// Why a completion could not be produced.
///
/// Callers map these to their own responses, so each kind names a distinct cause.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("No API key configured for the {0} provider")]
    MissingCredentials(&'static str),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Unknown model: {0:?}")]
    UnknownModel(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Request to the model provider timed out")]
    Timeout,

    #[error("Request to the model provider failed: {0}")]
    Request(String),

    #[error("Model provider returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response from the model provider: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::Request(err.to_string())
        }
    }
}
