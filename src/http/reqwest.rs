use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::LLMError;

use super::{DynHttpTransport, HttpRequest, HttpResponse, HttpStreamResponse, HttpTransport};

/// [`HttpTransport`] over a caller-owned `reqwest::Client`.
///
/// Clones of a `reqwest::Client` share one connection pool, so any number of
/// transports can wrap the same client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn prepare(&self, request: HttpRequest) -> Result<reqwest::RequestBuilder, LLMError> {
        let HttpRequest {
            url,
            headers,
            body,
            timeout,
        } = request;

        let mut header_map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|err| invalid_header(&name, err))?;
            let header_value =
                HeaderValue::from_str(&value).map_err(|err| invalid_header(&name, err))?;
            header_map.insert(header_name, header_value);
        }

        let mut builder = self.client.post(url).headers(header_map);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        Ok(builder)
    }

    /// Sends `request` and returns status, headers and the unread response.
    async fn dispatch(
        &self,
        request: HttpRequest,
    ) -> Result<(u16, HashMap<String, String>, reqwest::Response), LLMError> {
        tracing::trace!(url = %request.url, "dispatching request");
        let response = self
            .prepare(request)?
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let headers = header_map_to_strings(response.headers());
        Ok((status, headers, response))
    }
}

/// Non-UTF-8 header values are kept as empty strings.
fn header_map_to_strings(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = value.to_str().unwrap_or_default();
            (name.as_str().to_string(), value.to_string())
        })
        .collect()
}

fn invalid_header(name: &str, err: impl std::fmt::Display) -> LLMError {
    LLMError::InvalidConfig {
        field: format!("headers.{name}"),
        reason: err.to_string(),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> LLMError {
    if err.is_timeout() {
        LLMError::transport(format!("request timed out: {err}"))
    } else {
        LLMError::transport(err.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError> {
        let (status, headers, response) = self.dispatch(request).await?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, LLMError> {
        let (status, headers, response) = self.dispatch(request).await?;
        let body = response.bytes_stream().map(|chunk| match chunk {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(err) => Err(map_reqwest_error(err)),
        });
        Ok(HttpStreamResponse {
            status,
            headers,
            body: Box::pin(body),
        })
    }
}

/// Wraps a caller-owned client into a thread-safe transport handle.
pub fn dyn_transport(client: Client) -> DynHttpTransport {
    Arc::new(ReqwestTransport::new(client))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn prepare_rejects_invalid_header_names() {
        let transport = ReqwestTransport::new(Client::new());
        let request = HttpRequest::post_json("http://vllm.local/v1/chat/completions", Vec::new())
            .with_header("bad header", "value");
        match transport.prepare(request).unwrap_err() {
            LLMError::InvalidConfig { field, .. } => assert_eq!(field, "headers.bad header"),
            other => panic!("unexpected error type: {other:?}"),
        }
    }

    #[test]
    fn prepare_carries_headers_timeout_and_body() {
        let transport = ReqwestTransport::new(Client::new());
        let request = HttpRequest::post_json("http://vllm.local/v1/chat/completions", b"{}".to_vec())
            .with_header("Authorization", "Bearer sk-test")
            .with_timeout(Some(Duration::from_secs(7)));
        let built = transport
            .prepare(request)
            .expect("builder")
            .build()
            .expect("request");

        assert_eq!(built.method(), reqwest::Method::POST);
        assert_eq!(built.headers()["authorization"], "Bearer sk-test");
        assert_eq!(built.headers()["content-type"], "application/json");
        assert_eq!(built.timeout(), Some(&Duration::from_secs(7)));
        assert_eq!(built.body().and_then(|body| body.as_bytes()), Some(&b"{}"[..]));
    }

    #[test]
    fn header_values_are_copied_as_strings() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("2"));
        let map = header_map_to_strings(&headers);
        assert_eq!(map.get("retry-after"), Some(&"2".to_string()));
    }
}
