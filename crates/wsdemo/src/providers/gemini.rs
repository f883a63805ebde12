use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::base::{Provider, Usage};
use super::configs::GeminiProviderConfig;
use super::errors::ProviderError;
use super::utils::{ensure_model, handle_response};
use crate::models::message::Message;
use crate::models::role::Role;

pub const GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_MODEL: &str = "gemini-1.5-flash";

lazy_static! {
    // The model id becomes a url path segment
    static ref MODEL_ID: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("model id pattern is valid");
}

/// Strip the optional `models/` prefix and reject ids that are not a plain path segment
fn model_id(model: &str) -> Result<&str, ProviderError> {
    let model = ensure_model(model)?;
    let id = model.strip_prefix("models/").unwrap_or(model);
    if !MODEL_ID.is_match(id) {
        return Err(ProviderError::UnknownModel(model.to_string()));
    }
    Ok(id)
}

/// Google's generative language api (`generateContent`)
pub struct GeminiProvider {
    client: Client,
    config: GeminiProviderConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    fn messages_to_gemini_spec(messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|message| {
                let role = match message.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                json!({
                    "role": role,
                    "parts": [{"text": message.content}]
                })
            })
            .collect()
    }

    fn generation_config(&self) -> Option<Value> {
        let mut config = Map::new();
        if let Some(temp) = self.config.temperature {
            config.insert("temperature".to_string(), json!(temp));
        }
        if let Some(tokens) = self.config.max_tokens {
            config.insert("maxOutputTokens".to_string(), json!(tokens));
        }
        (!config.is_empty()).then_some(Value::Object(config))
    }

    fn get_usage(data: &Value) -> Usage {
        let usage = &data["usageMetadata"];
        let count = |key: &str| {
            usage
                .get(key)
                .and_then(|v| v.as_i64())
                .and_then(|v| i32::try_from(v).ok())
        };

        Usage::new(
            count("promptTokenCount"),
            count("candidatesTokenCount"),
            count("totalTokenCount"),
        )
    }

    fn response_to_message(response: &Value) -> Result<Message, ProviderError> {
        let Some(candidate) = response["candidates"].get(0) else {
            let reason = response["promptFeedback"]["blockReason"]
                .as_str()
                .unwrap_or("no candidates returned");
            return Err(ProviderError::InvalidResponse(format!(
                "Prompt was rejected: {}",
                reason
            )));
        };

        let parts = candidate["content"]["parts"].as_array().ok_or_else(|| {
            let reason = candidate["finishReason"].as_str().unwrap_or("unknown");
            ProviderError::InvalidResponse(format!(
                "Candidate has no content, finish reason: {}",
                reason
            ))
        })?;

        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        Ok(Message::assistant().with_text(text))
    }

    async fn post(&self, api_key: &str, model_id: &str, payload: Value) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.host.trim_end_matches('/'),
            model_id
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await?;

        handle_response(response, model_id).await
    }
}

#[async_trait]
impl Provider for GeminiProvider {
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
            .ok_or(ProviderError::MissingCredentials("gemini"))?;
        let model = model_id(model)?;

        let mut payload = json!({
            "contents": Self::messages_to_gemini_spec(messages)
        });
        // generateContent rejects an instruction with empty text
        if !system.is_empty() {
            payload["systemInstruction"] = json!({"parts": [{"text": system}]});
        }
        if let Some(config) = self.generation_config() {
            payload["generationConfig"] = config;
        }

        let response = self.post(api_key, model, payload).await?;

        let message = Self::response_to_message(&response)?;
        let usage = Self::get_usage(&response);

        Ok((message, usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{any, body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    fn config(host: String) -> GeminiProviderConfig {
        GeminiProviderConfig {
            host,
            api_key: Some("test_api_key".to_string()),
            model: GEMINI_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }

    fn text_response(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": {
                "promptTokenCount": 11,
                "candidatesTokenCount": 4,
                "totalTokenCount": 15
            }
        })
    }

    async fn setup_mock_server(response: ResponseTemplate) -> (MockServer, GeminiProvider) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "test_api_key"))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::new(config(mock_server.uri())).unwrap();
        (mock_server, provider)
    }

    #[tokio::test]
    async fn test_complete_basic() -> anyhow::Result<()> {
        let (_server, provider) = setup_mock_server(
            ResponseTemplate::new(200).set_body_json(text_response("Hello there!")),
        )
        .await;

        let (message, usage) = provider
            .complete(GEMINI_MODEL, "Be kind.", &[Message::user().with_text("Hi")])
            .await?;

        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.text(), "Hello there!");
        assert_eq!(usage, Usage::new(Some(11), Some(4), Some(15)));
        Ok(())
    }

    #[tokio::test]
    async fn test_payload_shape() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
            .and(body_json(json!({
                "systemInstruction": {"parts": [{"text": "sys"}]},
                "contents": [
                    {"role": "user", "parts": [{"text": "a"}]},
                    {"role": "model", "parts": [{"text": "b"}]},
                    {"role": "user", "parts": [{"text": "c"}]}
                ],
                "generationConfig": {"maxOutputTokens": 512}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("ok")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::new(GeminiProviderConfig {
            max_tokens: Some(512),
            ..config(mock_server.uri())
        })?;
        let messages = vec![
            Message::user().with_text("a"),
            Message::assistant().with_text("b"),
            Message::user().with_text("c"),
        ];

        let (message, _) = provider.complete("models/gemini-1.5-pro", "sys", &messages).await?;
        assert_eq!(message.text(), "ok");
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_system_prompt_is_omitted() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(body_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "Hi"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("ok")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = GeminiProvider::new(config(mock_server.uri()))?;
        let (message, _) = provider
            .complete(GEMINI_MODEL, "", &[Message::user().with_text("Hi")])
            .await?;
        assert_eq!(message.text(), "ok");
        Ok(())
    }

    #[tokio::test]
    async fn test_multiple_parts_are_joined() -> anyhow::Result<()> {
        let body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "world"}]},
                "finishReason": "STOP"
            }]
        });
        let (_server, provider) =
            setup_mock_server(ResponseTemplate::new(200).set_body_json(body)).await;

        let (message, usage) = provider
            .complete(GEMINI_MODEL, "", &[Message::user().with_text("Hi")])
            .await?;
        assert_eq!(message.text(), "Hello world");
        assert_eq!(usage, Usage::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_blocked_prompt() {
        let body = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let (_server, provider) =
            setup_mock_server(ResponseTemplate::new(200).set_body_json(body)).await;

        let result = provider
            .complete(GEMINI_MODEL, "", &[Message::user().with_text("Hi")])
            .await;
        assert!(matches!(
            result,
            Err(ProviderError::InvalidResponse(msg)) if msg.contains("SAFETY")
        ));
    }

    #[tokio::test]
    async fn test_candidate_without_content() {
        let body = json!({"candidates": [{"finishReason": "RECITATION"}]});
        let (_server, provider) =
            setup_mock_server(ResponseTemplate::new(200).set_body_json(body)).await;

        let result = provider
            .complete(GEMINI_MODEL, "", &[Message::user().with_text("Hi")])
            .await;
        assert!(matches!(
            result,
            Err(ProviderError::InvalidResponse(msg)) if msg.contains("RECITATION")
        ));
    }

    #[tokio::test]
    async fn test_invalid_api_key() {
        let body = json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{"reason": "API_KEY_INVALID"}]
            }
        });
        let (_server, provider) =
            setup_mock_server(ResponseTemplate::new(400).set_body_json(body)).await;

        let result = provider
            .complete(GEMINI_MODEL, "", &[Message::user().with_text("Hi")])
            .await;
        assert!(matches!(result, Err(ProviderError::Authentication(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let provider = GeminiProvider::new(GeminiProviderConfig {
            api_key: Some(String::new()),
            ..config("http://127.0.0.1:9".to_string())
        })
        .unwrap();

        let result = provider
            .complete(GEMINI_MODEL, "", &[Message::user().with_text("Hi")])
            .await;
        assert!(matches!(result, Err(ProviderError::MissingCredentials("gemini"))));
    }

    #[tokio::test]
    async fn test_blank_model() {
        let provider = GeminiProvider::new(config("http://127.0.0.1:9".to_string())).unwrap();
        let result = provider
            .complete(" ", "", &[Message::user().with_text("Hi")])
            .await;
        assert!(matches!(result, Err(ProviderError::UnknownModel(_))));
    }

    #[tokio::test]
    async fn test_model_id_must_be_a_path_segment() {
        let mock_server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("leaked")))
            .expect(0)
            .mount(&mock_server)
            .await;
        let provider = GeminiProvider::new(config(mock_server.uri())).unwrap();

        for model in ["../cachedContents?x=", "gemini-1.5-flash/../../files", "a b", "models/"] {
            let result = provider
                .complete(model, "", &[Message::user().with_text("Hi")])
                .await;
            assert!(
                matches!(result, Err(ProviderError::UnknownModel(_))),
                "{model} should be rejected"
            );
        }
    }

    #[test]
    fn test_model_id() {
        assert_eq!(model_id(" models/gemini-1.5-pro ").unwrap(), "gemini-1.5-pro");
        assert_eq!(model_id("gemini-2.0-flash-exp").unwrap(), "gemini-2.0-flash-exp");
        assert!(matches!(model_id("models/../x"), Err(ProviderError::UnknownModel(_))));
        assert!(matches!(model_id("gemini?alt=sse"), Err(ProviderError::UnknownModel(_))));
    }

    #[test]
    fn test_usage_out_of_range_is_dropped() {
        let usage = GeminiProvider::get_usage(&json!({
            "usageMetadata": {"promptTokenCount": 5_000_000_000i64, "candidatesTokenCount": 2}
        }));
        assert_eq!(usage, Usage::new(None, Some(2), None));
    }
}
