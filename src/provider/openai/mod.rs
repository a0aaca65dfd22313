//! OpenAI-compatible chat completions API.
//!
//! Streaming uses server-sent events carrying deltas, terminated by `data: [DONE]`.

mod error;
mod provider;
mod request;
mod response;
mod types;

pub use provider::OpenAiAdapter;
