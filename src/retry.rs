//! Bounded retry loop shared by every HTTP backend.
//!
//! Only the act of obtaining a response is retried: a complete body for one-shot calls,
//! or status and headers for streaming calls. Once a streaming body is being consumed
//! its failures are surfaced to the caller as they happen.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LLMError;
use crate::http::{
    HttpRequest, HttpResponse, HttpStreamResponse, HttpTransport, MAX_ERROR_BODY_BYTES,
    collect_body_text,
};

/// Retry policy applied to every backend call made by one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRetryConfig {
    /// Total number of attempts, the first one included.
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Delay before the first retry.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Growth factor applied to the delay after every retry.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Cap on any single delay, `Retry-After` included.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Statuses treated like transport failures. Other non-success statuses are final.
    #[serde(default = "default_retryable_statuses")]
    pub retryable_statuses: Vec<u16>,
}

fn default_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    100
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_max_delay_ms() -> u64 {
    1_000
}

fn default_retryable_statuses() -> Vec<u16> {
    vec![429, 500, 502, 503, 504]
}

impl Default for RequestRetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            multiplier: default_multiplier(),
            max_delay_ms: default_max_delay_ms(),
            retryable_statuses: default_retryable_statuses(),
        }
    }
}

impl RequestRetryConfig {
    /// Policy making a single attempt.
    pub fn no_retry() -> Self {
        Self {
            attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_backoff(mut self, initial: Duration, multiplier: f64, max: Duration) -> Self {
        self.initial_delay_ms = initial.as_millis() as u64;
        self.multiplier = multiplier;
        self.max_delay_ms = max.as_millis() as u64;
        self
    }

    pub fn with_retryable_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.retryable_statuses = statuses.into();
        self
    }

    /// Checks the invariants the retry loop relies on.
    pub fn validate(&self) -> Result<(), LLMError> {
        if self.attempts == 0 {
            return Err(invalid("attempts", "must be at least 1"));
        }
        if self.multiplier.is_nan() || self.multiplier < 1.0 {
            return Err(invalid("multiplier", "must be a number >= 1.0"));
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err(invalid("max_delay_ms", "must not be smaller than initial_delay_ms"));
        }
        Ok(())
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Delay before retry number `retry` (0-based), capped at `max_delay_ms`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use any_llm_client::RequestRetryConfig;
    ///
    /// let config = RequestRetryConfig::default();
    /// assert_eq!(config.delay_for_retry(0), Duration::from_millis(100));
    /// assert_eq!(config.delay_for_retry(1), Duration::from_millis(200));
    /// assert_eq!(config.delay_for_retry(10), Duration::from_millis(1_000));
    /// ```
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = retry.min(i32::MAX as u32) as i32;
        let delay = self.initial_delay_ms as f64 * self.multiplier.powi(exponent);
        let delay_ms = delay.min(self.max_delay_ms as f64) as u64;
        Duration::from_millis(delay_ms)
    }

    fn capped(&self, delay: Duration) -> Duration {
        delay.min(Duration::from_millis(self.max_delay_ms))
    }
}

fn invalid(field: &str, reason: &str) -> LLMError {
    LLMError::InvalidConfig {
        field: format!("request_retry.{field}"),
        reason: reason.to_string(),
    }
}

/// Outcome of a single attempt as seen by [`RequestRetryConfig::run`].
pub(crate) enum Attempt<T> {
    Success(T),
    /// Failure worth another attempt, with an optional server-suggested delay.
    Retry {
        error: LLMError,
        retry_after: Option<Duration>,
    },
    Fatal(LLMError),
}

impl RequestRetryConfig {
    /// Runs `attempt` until it succeeds, fails fatally, or the budget is spent.
    pub(crate) async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, LLMError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Attempt<T>>,
    {
        let attempts = self.attempts.max(1);
        let mut number = 1;
        loop {
            match attempt().await {
                Attempt::Success(value) => return Ok(value),
                Attempt::Fatal(error) => return Err(error),
                Attempt::Retry { error, retry_after } => {
                    if number >= attempts {
                        tracing::warn!(attempts, error = %error, "retry budget exhausted");
                        return Err(LLMError::RetriesExhausted {
                            attempts,
                            last: Box::new(error),
                        });
                    }
                    let delay = retry_after
                        .map(|delay| self.capped(delay))
                        .unwrap_or_else(|| self.delay_for_retry(number - 1));
                    tracing::warn!(
                        attempt = number,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    number += 1;
                }
            }
        }
    }
}

/// Extracts the `Retry-After` header (in seconds) if present.
///
/// HTTP-date values are ignored.
pub(crate) fn retry_after_from_headers(headers: &HashMap<String, String>) -> Option<Duration> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("retry-after"))
        .and_then(|(_, value)| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Sends a one-shot request under `policy`, returning a successful response.
///
/// `classify` turns a non-success status and its body into the caller-facing error.
pub(crate) async fn send_with_retry<C>(
    transport: &dyn HttpTransport,
    request: &HttpRequest,
    policy: &RequestRetryConfig,
    classify: C,
) -> Result<HttpResponse, LLMError>
where
    C: Fn(u16, String) -> LLMError + Sync,
{
    let classify = &classify;
    policy
        .run(move || async move {
            let response = match transport.send(request.clone()).await {
                Ok(response) => response,
                Err(error) => return transport_failure(error),
            };
            if response.is_success() {
                return Attempt::Success(response);
            }
            let status = response.status;
            let retry_after = retry_after_from_headers(&response.headers);
            let body = String::from_utf8_lossy(&response.body).into_owned();
            status_failure(policy, status, classify(status, body), retry_after)
        })
        .await
}

/// Opens a streaming response under `policy`.
///
/// Only connection establishment is retried; the returned body is handed over as is.
pub(crate) async fn send_stream_with_retry<C>(
    transport: &dyn HttpTransport,
    request: &HttpRequest,
    policy: &RequestRetryConfig,
    classify: C,
) -> Result<HttpStreamResponse, LLMError>
where
    C: Fn(u16, String) -> LLMError + Sync,
{
    let classify = &classify;
    policy
        .run(move || async move {
            let response = match transport.send_stream(request.clone()).await {
                Ok(response) => response,
                Err(error) => return transport_failure(error),
            };
            if response.is_success() {
                return Attempt::Success(response);
            }
            let HttpStreamResponse {
                status,
                headers,
                body,
            } = response;
            let retry_after = retry_after_from_headers(&headers);
            let text = match collect_body_text(body, MAX_ERROR_BODY_BYTES).await {
                Ok(text) => text,
                Err(error) => return transport_failure(error),
            };
            status_failure(policy, status, classify(status, text), retry_after)
        })
        .await
}

fn transport_failure<T>(error: LLMError) -> Attempt<T> {
    match error {
        LLMError::Transport { .. } => Attempt::Retry {
            error,
            retry_after: None,
        },
        other => Attempt::Fatal(other),
    }
}

fn status_failure<T>(
    policy: &RequestRetryConfig,
    status: u16,
    error: LLMError,
    retry_after: Option<Duration>,
) -> Attempt<T> {
    if policy.is_retryable_status(status) && !error.is_out_of_tokens_or_symbols() {
        Attempt::Retry { error, retry_after }
    } else {
        tracing::debug!(status, "non-retryable response status");
        Attempt::Fatal(error)
    }
}
