//! Unified client for OpenAI-compatible and YandexGPT LLM backends.
//!
//! A client is built once from an [`AnyLLMConfig`] and offers a one-shot completion
//! and a stream of partial messages, each item being the full text generated so far.
//!
//! ```no_run
//! use any_llm_client::{AnyLLMConfig, Message, RequestOptions, RequestRetryConfig, YandexGptConfig, get_client};
//! use any_llm_client::http::reqwest::dyn_transport;
//!
//! # async fn run() -> Result<(), any_llm_client::LLMError> {
//! let config = AnyLLMConfig::YandexGpt(YandexGptConfig::new("Api-Key ...", "folder", "yandexgpt"));
//! let client = get_client(&config, dyn_transport(reqwest::Client::new()), RequestRetryConfig::default())?;
//! let answer = client
//!     .request_llm_message(&[Message::user("Hi!")], &RequestOptions::default())
//!     .await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod retry;
pub mod stream;
pub mod types;

pub use client::{DynLLMClient, HttpLLMClient, LLMClient};
pub use config::{AnyLLMConfig, MockLLMConfig, OpenAiConfig, YandexGptConfig, get_client};
pub use error::LLMError;
pub use provider::BackendAdapter;
pub use retry::RequestRetryConfig;
pub use stream::PartialMessageStream;
pub use types::*;
