use reqwest::{Response, StatusCode};
use serde_json::{json, Value};

use super::base::Usage;
use super::errors::ProviderError;
use crate::models::message::Message;

/// Convert internal Message format to OpenAI's API message specification
pub fn messages_to_openai_spec(system: &str, messages: &[Message]) -> Vec<Value> {
    let mut messages_spec = Vec::with_capacity(messages.len() + 1);
    messages_spec.push(json!({
        "role": "system",
        "content": system
    }));

    for message in messages {
        messages_spec.push(json!({
            "role": message.role,
            "content": message.content
        }));
    }

    messages_spec
}

/// Convert OpenAI's API response to internal Message format
pub fn openai_response_to_message(response: &Value) -> Result<Message, ProviderError> {
    let text = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| {
            ProviderError::InvalidResponse(format!("No message content in response: {}", response))
        })?;

    Ok(Message::assistant().with_text(text))
}

pub fn get_openai_usage(data: &Value) -> Usage {
    let Some(usage) = data.get("usage") else {
        return Usage::default();
    };

    let input_tokens = usage
        .get("prompt_tokens")
        .and_then(|v| v.as_i64())
        .and_then(|v| i32::try_from(v).ok());

    let output_tokens = usage
        .get("completion_tokens")
        .and_then(|v| v.as_i64())
        .and_then(|v| i32::try_from(v).ok());

    let total_tokens = usage
        .get("total_tokens")
        .and_then(|v| v.as_i64())
        .and_then(|v| i32::try_from(v).ok())
        .or_else(|| match (input_tokens, output_tokens) {
            (Some(input), Some(output)) => input.checked_add(output),
            _ => None,
        });

    Usage::new(input_tokens, output_tokens, total_tokens)
}

pub fn ensure_model(model: &str) -> Result<&str, ProviderError> {
    let model = model.trim();
    if model.is_empty() {
        return Err(ProviderError::UnknownModel(model.to_string()));
    }
    Ok(model)
}

/// Return the JSON body of a successful response, or the error its status stands for
pub async fn handle_response(response: Response, model: &str) -> Result<Value, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_to_error(status, &body, model))
}

pub fn status_to_error(status: StatusCode, body: &str, model: &str) -> ProviderError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Authentication(message),
        // Gemini reports a bad key as a 400 with this reason
        StatusCode::BAD_REQUEST if body.contains("API_KEY_INVALID") => {
            ProviderError::Authentication(message)
        }
        StatusCode::NOT_FOUND => ProviderError::UnknownModel(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderError::Timeout,
        _ => ProviderError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

// Both OpenAI and Gemini wrap failures as {"error": {"message": ...}}
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
