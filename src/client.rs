use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LLMError;
use crate::http::DynHttpTransport;
use crate::provider::BackendAdapter;
use crate::retry::{RequestRetryConfig, send_stream_with_retry, send_with_retry};
use crate::stream::{PartialMessageStream, PartialTextStream};
use crate::types::{Message, RequestOptions};

/// Backend-independent completion contract.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Sends `messages` and waits for the complete answer.
    async fn request_llm_message(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<String, LLMError>;

    /// Sends `messages` and returns the growing answer as a stream.
    ///
    /// Every item is the full text generated so far. The stream owns the response
    /// body; dropping it at any point releases the connection.
    async fn stream_llm_partial_messages(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<PartialMessageStream, LLMError>;

    /// Backend name, such as `openai`.
    fn name(&self) -> &'static str;
}

/// Thread-safe client handle.
pub type DynLLMClient = Arc<dyn LLMClient>;

/// [`LLMClient`] for HTTP backends: one adapter, a caller-owned transport and a retry
/// policy.
pub struct HttpLLMClient {
    adapter: Arc<dyn BackendAdapter>,
    transport: DynHttpTransport,
    retry: RequestRetryConfig,
}

impl HttpLLMClient {
    pub fn new(
        adapter: Arc<dyn BackendAdapter>,
        transport: DynHttpTransport,
        retry: RequestRetryConfig,
    ) -> Self {
        Self {
            adapter,
            transport,
            retry,
        }
    }

    pub fn retry_config(&self) -> &RequestRetryConfig {
        &self.retry
    }
}

#[async_trait]
impl LLMClient for HttpLLMClient {
    async fn request_llm_message(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<String, LLMError> {
        let adapter = self.adapter.as_ref();
        let request = adapter.build_request(messages, options, false)?;
        tracing::debug!(
            provider = adapter.name(),
            url = %request.url,
            messages = messages.len(),
            "requesting llm message"
        );
        let response = send_with_retry(
            self.transport.as_ref(),
            &request,
            &self.retry,
            |status, body| adapter.classify_error(status, body),
        )
        .await?;
        adapter.parse_complete_response(&response.body)
    }

    async fn stream_llm_partial_messages(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<PartialMessageStream, LLMError> {
        let adapter = self.adapter.as_ref();
        let request = adapter.build_request(messages, options, true)?;
        tracing::debug!(
            provider = adapter.name(),
            url = %request.url,
            messages = messages.len(),
            "opening llm stream"
        );
        let response = send_stream_with_retry(
            self.transport.as_ref(),
            &request,
            &self.retry,
            |status, body| adapter.classify_error(status, body),
        )
        .await?;
        Ok(Box::pin(PartialTextStream::new(
            response.body,
            Arc::clone(&self.adapter),
        )))
    }

    fn name(&self) -> &'static str {
        self.adapter.name()
    }
}
