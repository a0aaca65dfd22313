use thiserror::Error;

/// Aggregates every failure mode exposed by the unified LLM client.
///
/// [`LLMError::OutOfTokensOrSymbols`] is the only specialization of a failed HTTP
/// response; every other non-success status surfaces as [`LLMError::Backend`]. Both
/// keep the originating status code and the raw body for diagnostics.
#[derive(Debug, Error)]
pub enum LLMError {
    /// Represents transport-layer or networking failures, timeouts included.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// Generic non-success response returned by a backend.
    #[error("{provider} responded with status {status}: {body}")]
    Backend {
        /// Name of the backend, such as `yandexgpt`.
        provider: &'static str,
        /// HTTP status code of the failed response.
        status: u16,
        /// Raw response body, kept verbatim for debugging.
        body: String,
    },
    /// The input exceeded the token or symbol capacity of the model.
    #[error("{provider} rejected the input as too long (status {status}): {body}")]
    OutOfTokensOrSymbols {
        provider: &'static str,
        status: u16,
        body: String,
    },
    /// A success response whose payload violates the backend contract, for example an
    /// empty list of alternatives.
    #[error("invalid {provider} response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },
    /// Every attempt allowed by the retry policy failed.
    #[error("request failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts that were made.
        attempts: u32,
        /// Failure observed on the final attempt.
        #[source]
        last: Box<LLMError>,
    },
    /// Raised when building or validating configuration fails.
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// Name of the configuration field that failed validation.
        field: String,
        /// Additional context explaining why the field is invalid.
        reason: String,
    },
    /// The request body could not be encoded.
    #[error("failed to serialize request: {message}")]
    Serialization { message: String },
}

impl LLMError {
    /// Creates an [`LLMError::Transport`] from a textual description.
    ///
    /// # Examples
    ///
    /// ```
    /// use any_llm_client::error::LLMError;
    ///
    /// let err = LLMError::transport("dns lookup failed");
    /// assert!(matches!(err, LLMError::Transport { .. }));
    /// ```
    pub fn transport<T: Into<String>>(message: T) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an [`LLMError::InvalidResponse`] for the given backend.
    pub fn invalid_response<T: Into<String>>(provider: &'static str, message: T) -> Self {
        Self::InvalidResponse {
            provider,
            message: message.into(),
        }
    }

    /// HTTP status of the response that caused the error, looking through
    /// [`LLMError::RetriesExhausted`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } | Self::OutOfTokensOrSymbols { status, .. } => {
                Some(*status)
            }
            Self::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// Raw body of the response that caused the error, looking through
    /// [`LLMError::RetriesExhausted`].
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Backend { body, .. } | Self::OutOfTokensOrSymbols { body, .. } => Some(body),
            Self::RetriesExhausted { last, .. } => last.body(),
            _ => None,
        }
    }

    /// Returns `true` for [`LLMError::OutOfTokensOrSymbols`].
    ///
    /// # Examples
    ///
    /// ```
    /// use any_llm_client::error::LLMError;
    ///
    /// let err = LLMError::OutOfTokensOrSymbols { provider: "yandexgpt", status: 400, body: String::new() };
    /// assert!(err.is_out_of_tokens_or_symbols());
    /// assert!(!LLMError::transport("reset").is_out_of_tokens_or_symbols());
    /// ```
    pub fn is_out_of_tokens_or_symbols(&self) -> bool {
        matches!(self, Self::OutOfTokensOrSymbols { .. })
    }
}

/// Maps a failed response to the shared taxonomy.
///
/// `overflow` is the backend-specific predicate recognizing capacity errors from the
/// status code and raw body text.
pub(crate) fn classify_status_error(
    provider: &'static str,
    status: u16,
    body: String,
    overflow: impl Fn(u16, &str) -> bool,
) -> LLMError {
    if overflow(status, &body) {
        tracing::debug!(provider, status, "response classified as out of tokens or symbols");
        LLMError::OutOfTokensOrSymbols {
            provider,
            status,
            body,
        }
    } else {
        LLMError::Backend {
            provider,
            status,
            body,
        }
    }
}
