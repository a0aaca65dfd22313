//! YandexGPT foundation models completion API.
//!
//! Streaming responses are NDJSON where every line repeats the full text generated so
//! far, so each line is a snapshot rather than a delta.

mod error;
mod provider;
mod request;
mod response;
mod types;

pub use provider::YandexGptAdapter;
