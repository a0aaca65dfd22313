use crate::error::LLMError;
use crate::http::HttpRequest;
use crate::stream::{StreamFraming, StreamUpdate};
use crate::types::{Message, RequestOptions};

pub mod mock;
pub mod openai;
pub mod yandexgpt;

/// Wire-level behavior of one HTTP backend.
///
/// Adapters are pure: they build requests and interpret bodies, while sending,
/// retrying and stream ownership live in [`crate::client::HttpLLMClient`].
pub trait BackendAdapter: Send + Sync {
    /// Backend name used in errors and logs, such as `yandexgpt`.
    fn name(&self) -> &'static str;

    /// Builds the request for `messages`, setting the backend's stream flag when
    /// `stream` is true. Message order is preserved.
    fn build_request(
        &self,
        messages: &[Message],
        options: &RequestOptions,
        stream: bool,
    ) -> Result<HttpRequest, LLMError>;

    /// Extracts the completion text from a full response body.
    ///
    /// Fails with [`LLMError::InvalidResponse`] when the result list is missing or
    /// empty; an empty completion is never substituted.
    fn parse_complete_response(&self, body: &[u8]) -> Result<String, LLMError>;

    /// Interprets one payload of a streaming body.
    fn parse_stream_chunk(&self, line: &[u8]) -> Result<StreamUpdate, LLMError>;

    /// Maps a non-success response to the shared error taxonomy.
    fn classify_error(&self, status: u16, body: String) -> LLMError;

    fn stream_framing(&self) -> StreamFraming;
}

/// Decodes a JSON body, reporting failures as [`LLMError::InvalidResponse`].
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    provider: &'static str,
    body: &[u8],
) -> Result<T, LLMError> {
    serde_json::from_slice(body)
        .map_err(|err| LLMError::invalid_response(provider, format!("failed to parse body: {err}")))
}
