use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_core::Stream;
use futures_util::StreamExt;

use crate::error::LLMError;

/// POST request handed to an [`HttpTransport`].
///
/// Backend adapters build one per logical call and the retry loop re-sends that same
/// value, so it must stay cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    /// Overrides the transport's own timeout for this request.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// JSON POST to `url` carrying an already encoded body.
    ///
    /// ```
    /// use any_llm_client::http::HttpRequest;
    ///
    /// let request = HttpRequest::post_json("http://vllm.local/v1/chat/completions", b"{}".to_vec());
    /// assert_eq!(request.headers["Content-Type"], "application/json");
    /// assert!(request.timeout.is_none());
    /// ```
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body: Some(body),
            timeout: None,
        }
    }

    /// Encodes `body` as JSON and wraps it with [`HttpRequest::post_json`].
    ///
    /// # Errors
    ///
    /// [`LLMError::Serialization`] when serde_json rejects the value.
    pub fn post_serialized<T: serde::Serialize>(
        url: impl Into<String>,
        body: &T,
    ) -> Result<Self, LLMError> {
        let payload = serde_json::to_vec(body).map_err(|err| LLMError::Serialization {
            message: err.to_string(),
        })?;
        Ok(Self::post_json(url, payload))
    }

    /// Sets `name`, replacing an earlier value.
    ///
    /// ```
    /// use any_llm_client::http::HttpRequest;
    ///
    /// let request = HttpRequest::post_json("https://llm.api.cloud.yandex.net", Vec::new())
    ///     .with_header("x-data-logging-enabled", "false");
    /// assert_eq!(request.headers["x-data-logging-enabled"], "false");
    /// ```
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Fully buffered response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Response whose body is still arriving.
///
/// Holding `body` keeps the connection open; dropping it closes the connection.
pub struct HttpStreamResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: HttpBodyStream,
}

impl HttpStreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Raw body chunks as they come off the wire.
pub type HttpBodyStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, LLMError>> + Send>>;

/// Seam between the clients and the HTTP library.
///
/// The caller owns the transport and with it pooling, TLS and default timeouts.
/// Tests substitute an in-memory implementation:
///
/// ```
/// # use async_trait::async_trait;
/// # use any_llm_client::http::{HttpTransport, HttpRequest, HttpResponse, HttpStreamResponse};
/// # use any_llm_client::error::LLMError;
/// # use futures_util::stream;
/// struct Canned(&'static str);
///
/// #[async_trait]
/// impl HttpTransport for Canned {
///     async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, LLMError> {
///         Ok(HttpResponse { status: 200, headers: Default::default(), body: self.0.as_bytes().to_vec() })
///     }
///
///     async fn send_stream(&self, _request: HttpRequest) -> Result<HttpStreamResponse, LLMError> {
///         let chunks = vec![Ok(self.0.as_bytes().to_vec())];
///         Ok(HttpStreamResponse { status: 200, headers: Default::default(), body: Box::pin(stream::iter(chunks)) })
///     }
/// }
/// ```
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Resolves once the whole body has been read.
    ///
    /// Non-2xx statuses are returned as responses; only network failures and
    /// timeouts become [`LLMError::Transport`].
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError>;

    /// Resolves as soon as status and headers are known.
    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, LLMError>;
}

/// Thread-safe handle to a transport implementation.
pub type DynHttpTransport = Arc<dyn HttpTransport>;

/// Upper bound on how much of an error body is kept for diagnostics.
pub(crate) const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Reads an error body, keeping at most `limit` bytes.
///
/// Invalid UTF-8 is replaced rather than rejected so the status can still be
/// classified; only a failed chunk read is an error.
pub(crate) async fn collect_body_text(
    mut body: HttpBodyStream,
    limit: usize,
) -> Result<String, LLMError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        let room = limit.saturating_sub(bytes.len());
        bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
        if bytes.len() >= limit {
            break;
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub mod reqwest;
