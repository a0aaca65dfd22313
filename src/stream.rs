//! Streaming body decoding and partial-text reconciliation.
//!
//! [`FrameDecoder`] splits a raw body into payloads (NDJSON lines or SSE `data:` events),
//! and [`PartialTextStream`] turns those payloads into the full completion text observed
//! so far.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::error::LLMError;
use crate::http::HttpBodyStream;
use crate::provider::BackendAdapter;

/// Stream of reconciled partial messages handed to callers.
///
/// Each item is the full completion so far. The stream owns the HTTP body, so dropping
/// it releases the connection.
pub type PartialMessageStream = Pin<Box<dyn Stream<Item = Result<String, LLMError>> + Send>>;

/// How a backend frames its streaming body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFraming {
    /// One JSON document per line.
    Ndjson,
    /// Server-sent events whose `data:` payloads are JSON documents, ended by `[DONE]`.
    Sse,
}

/// What one streaming chunk says about the completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// Full text generated so far; replaces the previous partial text.
    Snapshot(String),
    /// Only the newly generated suffix.
    Delta(String),
}

/// Splits a raw body stream into independent payloads.
pub struct FrameDecoder {
    body: HttpBodyStream,
    framing: StreamFraming,
    buffer: Vec<u8>,
    data_lines: Vec<Vec<u8>>,
    pending: VecDeque<Result<String, LLMError>>,
    stream_closed: bool,
    done_received: bool,
}

impl FrameDecoder {
    pub fn new(body: HttpBodyStream, framing: StreamFraming) -> Self {
        Self {
            body,
            framing,
            buffer: Vec::new(),
            data_lines: Vec::new(),
            pending: VecDeque::new(),
            stream_closed: false,
            done_received: false,
        }
    }

    fn handle_line(&mut self, line: Vec<u8>) {
        match self.framing {
            StreamFraming::Ndjson => {
                if line.iter().all(u8::is_ascii_whitespace) {
                    return;
                }
                let payload = decode_utf8(line);
                self.pending.push_back(payload);
            }
            StreamFraming::Sse => {
                if line.is_empty() {
                    self.flush_event();
                } else if let Some(data) = line.strip_prefix(b"data:") {
                    let data = data.strip_prefix(b" ").unwrap_or(data);
                    self.data_lines.push(data.to_vec());
                }
            }
        }
    }

    fn flush_event(&mut self) {
        if self.data_lines.is_empty() {
            return;
        }
        let joined = self.data_lines.drain(..).collect::<Vec<_>>().join(&b'\n');
        match decode_utf8(joined) {
            Ok(data) if data.trim() == "[DONE]" => self.done_received = true,
            Ok(data) if data.trim().is_empty() => {}
            other => self.pending.push_back(other),
        }
    }

    fn drain_line(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
        buffer.iter().position(|b| *b == b'\n').map(|pos| {
            let mut line: Vec<u8> = buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            line
        })
    }
}

fn decode_utf8(bytes: Vec<u8>) -> Result<String, LLMError> {
    String::from_utf8(bytes)
        .map_err(|err| LLMError::transport(format!("invalid UTF-8 in stream chunk: {err}")))
}

impl Stream for FrameDecoder {
    type Item = Result<String, LLMError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(payload) = this.pending.pop_front() {
                return Poll::Ready(Some(payload));
            }
            if this.done_received || this.stream_closed {
                return Poll::Ready(None);
            }

            match this.body.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    this.buffer.extend_from_slice(&bytes);
                    while let Some(line) = Self::drain_line(&mut this.buffer) {
                        this.handle_line(line);
                        if this.done_received {
                            break;
                        }
                    }
                }
                Poll::Ready(Some(Err(err))) => {
                    this.stream_closed = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    this.stream_closed = true;
                    if !this.buffer.is_empty() {
                        let line = std::mem::take(&mut this.buffer);
                        this.handle_line(line);
                    }
                    if this.framing == StreamFraming::Sse {
                        this.flush_event();
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Reconciles adapter updates into the full text observed so far.
///
/// The first failure is yielded once and ends the stream.
pub struct PartialTextStream {
    frames: FrameDecoder,
    adapter: Arc<dyn BackendAdapter>,
    text: String,
    finished: bool,
}

impl PartialTextStream {
    pub fn new(body: HttpBodyStream, adapter: Arc<dyn BackendAdapter>) -> Self {
        let frames = FrameDecoder::new(body, adapter.stream_framing());
        Self {
            frames,
            adapter,
            text: String::new(),
            finished: false,
        }
    }

    /// Applies one update, returning the text to emit if anything changed.
    fn apply(&mut self, update: StreamUpdate) -> Option<String> {
        match update {
            StreamUpdate::Snapshot(text) => {
                self.text = text;
                Some(self.text.clone())
            }
            StreamUpdate::Delta(delta) if delta.is_empty() => None,
            StreamUpdate::Delta(delta) => {
                self.text.push_str(&delta);
                Some(self.text.clone())
            }
        }
    }
}

impl Stream for PartialTextStream {
    type Item = Result<String, LLMError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        loop {
            let payload = match Pin::new(&mut this.frames).poll_next(cx) {
                Poll::Ready(Some(Ok(payload))) => payload,
                Poll::Ready(Some(Err(err))) => {
                    this.finished = true;
                    tracing::debug!(provider = this.adapter.name(), error = %err, "stream failed");
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    this.finished = true;
                    tracing::debug!(provider = this.adapter.name(), "stream completed");
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            };

            match this.adapter.parse_stream_chunk(payload.as_bytes()) {
                Ok(update) => {
                    if let Some(text) = this.apply(update) {
                        return Poll::Ready(Some(Ok(text)));
                    }
                }
                Err(err) => {
                    this.finished = true;
                    tracing::debug!(provider = this.adapter.name(), error = %err, "stream chunk rejected");
                    return Poll::Ready(Some(Err(err)));
                }
            }
        }
    }
}
