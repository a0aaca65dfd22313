#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use any_llm_client::LLMError;
use any_llm_client::http::{HttpRequest, HttpResponse, HttpStreamResponse, HttpTransport};
use async_trait::async_trait;
use futures_util::{StreamExt, stream};

/// One scripted reply: a status plus the body split into wire chunks.
pub struct ScriptedReply {
    status: u16,
    headers: HashMap<String, String>,
    chunks: Vec<Vec<u8>>,
    endless: bool,
    dropped: Option<Arc<AtomicBool>>,
}

/// In-memory transport replaying scripted replies in order and recording requests.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<ScriptedReply, LLMError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.reply_chunks(status, vec![body.into()])
    }

    pub fn reply_chunks(self, status: u16, chunks: Vec<Vec<u8>>) -> Self {
        self.push(Ok(ScriptedReply {
            status,
            headers: HashMap::new(),
            chunks,
            endless: false,
            dropped: None,
        }))
    }

    /// Streaming reply that never ends on its own; `dropped` flips once the body is
    /// released.
    pub fn reply_endless(self, chunks: Vec<Vec<u8>>, dropped: Arc<AtomicBool>) -> Self {
        self.push(Ok(ScriptedReply {
            status: 200,
            headers: HashMap::new(),
            chunks,
            endless: true,
            dropped: Some(dropped),
        }))
    }

    pub fn reply_with_header(self, status: u16, name: &str, value: &str) -> Self {
        self.push(Ok(ScriptedReply {
            status,
            headers: HashMap::from([(name.to_string(), value.to_string())]),
            chunks: Vec::new(),
            endless: false,
            dropped: None,
        }))
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Err(LLMError::transport(message)))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request_json(&self, index: usize) -> serde_json::Value {
        let request = &self.requests()[index];
        serde_json::from_slice(request.body.as_deref().expect("request body")).expect("json body")
    }

    fn push(self, reply: Result<ScriptedReply, LLMError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    fn next(&self, request: HttpRequest) -> Result<ScriptedReply, LLMError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted reply left")
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError> {
        let reply = self.next(request)?;
        Ok(HttpResponse {
            status: reply.status,
            headers: reply.headers,
            body: reply.chunks.concat(),
        })
    }

    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, LLMError> {
        let reply = self.next(request)?;
        let guard = reply.dropped.map(DropFlag);
        let chunks = stream::iter(reply.chunks.into_iter().map(Ok));
        let body = if reply.endless {
            chunks.chain(stream::pending()).boxed()
        } else {
            chunks.boxed()
        };
        let body = body.map(move |chunk| {
            let _guard = &guard;
            chunk
        });
        Ok(HttpStreamResponse {
            status: reply.status,
            headers: reply.headers,
            body: Box::pin(body),
        })
    }
}

/// Collects a stream of partial messages, stopping at the first error.
pub async fn collect_partial_messages(
    mut stream: any_llm_client::PartialMessageStream,
) -> Result<Vec<String>, LLMError> {
    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
        items.push(item?);
    }
    Ok(items)
}
