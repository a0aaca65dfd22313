use crate::config::YandexGptConfig;
use crate::error::LLMError;
use crate::http::HttpRequest;
use crate::provider::BackendAdapter;
use crate::stream::{StreamFraming, StreamUpdate};
use crate::types::{Message, RequestOptions};

use super::error::parse_yandexgpt_error;
use super::request::build_yandexgpt_body;
use super::response::first_alternative_text;

/// Adapter for the YandexGPT completion endpoint.
#[derive(Debug, Clone)]
pub struct YandexGptAdapter {
    config: YandexGptConfig,
}

impl YandexGptAdapter {
    pub fn new(config: YandexGptConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &YandexGptConfig {
        &self.config
    }
}

impl BackendAdapter for YandexGptAdapter {
    fn name(&self) -> &'static str {
        "yandexgpt"
    }

    fn build_request(
        &self,
        messages: &[Message],
        options: &RequestOptions,
        stream: bool,
    ) -> Result<HttpRequest, LLMError> {
        let body = build_yandexgpt_body(&self.config, messages, options, stream);
        Ok(HttpRequest::post_serialized(&self.config.url, &body)?
            .with_header("Authorization", &self.config.auth_header)
            .with_header("x-data-logging-enabled", "false")
            .with_timeout(self.config.timeout()))
    }

    fn parse_complete_response(&self, body: &[u8]) -> Result<String, LLMError> {
        first_alternative_text(self.name(), body)
    }

    fn parse_stream_chunk(&self, line: &[u8]) -> Result<StreamUpdate, LLMError> {
        first_alternative_text(self.name(), line).map(StreamUpdate::Snapshot)
    }

    fn classify_error(&self, status: u16, body: String) -> LLMError {
        parse_yandexgpt_error(status, body)
    }

    fn stream_framing(&self) -> StreamFraming {
        StreamFraming::Ndjson
    }
}
