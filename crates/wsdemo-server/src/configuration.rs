use crate::error::{to_env_var, ConfigError, ENV_PREFIX};
use axum::http::HeaderValue;
use config::{Config, Environment};
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use wsdemo::providers::{
    configs::{GeminiProviderConfig, OllamaProviderConfig, OpenAiProviderConfig, ProviderConfig},
    gemini, ollama, openai,
};

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                env_var: to_env_var("server.host"),
                message: format!("{}:{} is not a socket address ({})", self.host, self.port, e),
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct PromptSettings {
    #[serde(default = "default_prompts_dir")]
    pub dir: PathBuf,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            dir: default_prompts_dir(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CorsSettings {
    #[serde(default = "default_origins")]
    pub origins: Vec<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            origins: default_origins(),
        }
    }
}

impl CorsSettings {
    /// Whitelisted origins with cookies allowed; methods and headers are mirrored back
    pub fn layer(&self) -> Result<CorsLayer, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            env_var: to_env_var("cors.origins"),
            message,
        };

        let mut origins = Vec::with_capacity(self.origins.len());
        for origin in self.origins.iter().map(|o| o.trim()).filter(|o| !o.is_empty()) {
            if origin == "*" {
                return Err(invalid(
                    "a wildcard origin cannot be used when credentials are allowed".to_string(),
                ));
            }
            let value = HeaderValue::from_str(origin)
                .map_err(|e| invalid(format!("{:?} is not a valid origin ({})", origin, e)))?;
            origins.push(value);
        }

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum ProviderSettings {
    Gemini {
        #[serde(default = "default_gemini_host")]
        host: String,
        #[serde(default = "default_gemini_api_key")]
        api_key: Option<String>,
        #[serde(default = "default_gemini_model")]
        model: String,
        #[serde(default)]
        temperature: Option<f32>,
        #[serde(default)]
        max_tokens: Option<i32>,
    },
    OpenAi {
        #[serde(default = "default_openai_host")]
        host: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_openai_model")]
        model: String,
        #[serde(default)]
        temperature: Option<f32>,
        #[serde(default)]
        max_tokens: Option<i32>,
    },
    Ollama {
        #[serde(default = "default_ollama_host")]
        host: String,
        #[serde(default = "default_ollama_model")]
        model: String,
        #[serde(default)]
        temperature: Option<f32>,
        #[serde(default)]
        max_tokens: Option<i32>,
    },
}

impl ProviderSettings {
    // Convert to the wsdemo ProviderConfig
    pub fn into_config(self) -> ProviderConfig {
        match self {
            ProviderSettings::Gemini {
                host,
                api_key,
                model,
                temperature,
                max_tokens,
            } => ProviderConfig::Gemini(GeminiProviderConfig {
                host,
                api_key,
                model,
                temperature,
                max_tokens,
            }),
            ProviderSettings::OpenAi {
                host,
                api_key,
                model,
                temperature,
                max_tokens,
            } => ProviderConfig::OpenAi(OpenAiProviderConfig {
                host,
                api_key,
                model,
                temperature,
                max_tokens,
            }),
            ProviderSettings::Ollama {
                host,
                model,
                temperature,
                max_tokens,
            } => ProviderConfig::Ollama(OllamaProviderConfig {
                host,
                model,
                temperature,
                max_tokens,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub prompts: PromptSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    pub provider: ProviderSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("provider.type", "gemini")?
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.origins")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            ConfigError::Other(err)
        })?;
        Ok(settings)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("ai_prompts")
}

fn default_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "https://wsdemo-app-165871915889.us-central1.run.app".to_string(),
    ]
}

fn default_gemini_host() -> String {
    gemini::GEMINI_HOST.to_string()
}

// Deployments that predate the WSDEMO_ prefix only set these two
fn default_gemini_api_key() -> Option<String> {
    env::var("GEMINI_API_KEY").ok().filter(|key| !key.is_empty())
}

fn default_gemini_model() -> String {
    env::var("GEMINI_MODEL")
        .ok()
        .filter(|model| !model.is_empty())
        .unwrap_or_else(|| gemini::GEMINI_MODEL.to_string())
}

fn default_openai_host() -> String {
    openai::OPENAI_HOST.to_string()
}

fn default_openai_model() -> String {
    openai::OPENAI_MODEL.to_string()
}

fn default_ollama_host() -> String {
    ollama::OLLAMA_HOST.to_string()
}

fn default_ollama_model() -> String {
    ollama::OLLAMA_MODEL.to_string()
}
