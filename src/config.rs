use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::{DynLLMClient, HttpLLMClient};
use crate::error::LLMError;
use crate::http::DynHttpTransport;
use crate::provider::mock::MockLLMClient;
use crate::provider::openai::OpenAiAdapter;
use crate::provider::yandexgpt::YandexGptAdapter;
use crate::retry::RequestRetryConfig;

const YANDEXGPT_DEFAULT_URL: &str =
    "https://llm.api.cloud.yandex.net/foundationModels/v1/completion";

/// Backend selection plus everything needed to talk to it.
///
/// Deserializes from an object tagged with `api_type`:
///
/// ```
/// use any_llm_client::config::AnyLLMConfig;
///
/// let config: AnyLLMConfig = serde_json::from_str(
///     r#"{"api_type": "yandexgpt", "auth_header": "Api-Key secret", "folder_id": "b1g", "model_name": "yandexgpt"}"#,
/// )
/// .unwrap();
/// assert!(matches!(config, AnyLLMConfig::YandexGpt(_)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "api_type")]
pub enum AnyLLMConfig {
    #[serde(rename = "openai")]
    OpenAi(OpenAiConfig),
    #[serde(rename = "yandexgpt")]
    YandexGpt(YandexGptConfig),
    #[serde(rename = "mock")]
    Mock(MockLLMConfig),
}

impl AnyLLMConfig {
    /// Rejects configurations that cannot produce a valid request.
    pub fn validate(&self) -> Result<(), LLMError> {
        match self {
            Self::OpenAi(config) => config.validate(),
            Self::YandexGpt(config) => config.validate(),
            Self::Mock(_) => Ok(()),
        }
    }
}

/// OpenAI-compatible chat completions endpoint (OpenAI, vLLM, and similar servers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Full chat completions URL, e.g. `http://127.0.0.1:8000/v1/chat/completions`.
    pub url: String,
    /// Bearer token; omitted for servers without authentication.
    #[serde(default)]
    pub auth_token: Option<String>,
    pub model_name: String,
    /// Rewrites history so user and assistant turns strictly alternate, for models
    /// whose chat template rejects anything else.
    #[serde(default)]
    pub force_user_assistant_message_alternation: bool,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl OpenAiConfig {
    pub fn new(url: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_token: None,
            model_name: model_name.into(),
            force_user_assistant_message_alternation: false,
            timeout_ms: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_message_alternation(mut self, enabled: bool) -> Self {
        self.force_user_assistant_message_alternation = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), LLMError> {
        require_non_empty("openai.url", &self.url)?;
        require_non_empty("openai.model_name", &self.model_name)
    }
}

/// YandexGPT foundation models completion API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YandexGptConfig {
    #[serde(default = "default_yandexgpt_url")]
    pub url: String,
    /// Complete `Authorization` header value, e.g. `Api-Key ...` or `Bearer ...`.
    pub auth_header: String,
    pub folder_id: String,
    pub model_name: String,
    #[serde(default = "default_model_version")]
    pub model_version: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_yandexgpt_url() -> String {
    YANDEXGPT_DEFAULT_URL.to_string()
}

fn default_model_version() -> String {
    "latest".to_string()
}

fn default_max_tokens() -> u32 {
    7400
}

impl YandexGptConfig {
    pub fn new(
        auth_header: impl Into<String>,
        folder_id: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            url: default_yandexgpt_url(),
            auth_header: auth_header.into(),
            folder_id: folder_id.into(),
            model_name: model_name.into(),
            model_version: default_model_version(),
            max_tokens: default_max_tokens(),
            timeout_ms: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_model_version(mut self, version: impl Into<String>) -> Self {
        self.model_version = version.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// `gpt://{folder_id}/{model_name}/{model_version}`
    pub fn model_uri(&self) -> String {
        format!(
            "gpt://{}/{}/{}",
            self.folder_id, self.model_name, self.model_version
        )
    }

    pub fn validate(&self) -> Result<(), LLMError> {
        require_non_empty("yandexgpt.url", &self.url)?;
        require_non_empty("yandexgpt.auth_header", &self.auth_header)?;
        require_non_empty("yandexgpt.folder_id", &self.folder_id)?;
        require_non_empty("yandexgpt.model_name", &self.model_name)?;
        if self.max_tokens == 0 {
            return Err(LLMError::InvalidConfig {
                field: "yandexgpt.max_tokens".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Canned outputs for the mock backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockLLMConfig {
    #[serde(default)]
    pub response_message: String,
    #[serde(default)]
    pub stream_messages: Vec<String>,
}

fn require_non_empty(field: &str, value: &str) -> Result<(), LLMError> {
    if value.trim().is_empty() {
        return Err(LLMError::InvalidConfig {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Builds the client for `config`.
///
/// The backend is chosen once here; the transport is shared with the caller and the
/// retry policy applies to every call made through the returned client.
pub fn get_client(
    config: &AnyLLMConfig,
    transport: DynHttpTransport,
    retry: RequestRetryConfig,
) -> Result<DynLLMClient, LLMError> {
    config.validate()?;
    retry.validate()?;

    let client: DynLLMClient = match config {
        AnyLLMConfig::OpenAi(openai) => Arc::new(HttpLLMClient::new(
            Arc::new(OpenAiAdapter::new(openai.clone())),
            transport,
            retry,
        )),
        AnyLLMConfig::YandexGpt(yandex) => Arc::new(HttpLLMClient::new(
            Arc::new(YandexGptAdapter::new(yandex.clone())),
            transport,
            retry,
        )),
        AnyLLMConfig::Mock(mock) => Arc::new(MockLLMClient::new(mock.clone())),
    };
    tracing::debug!(provider = client.name(), "llm client created");

    Ok(client)
}
