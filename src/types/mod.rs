//! Shared data structures describing requests sent to any backend.
//!
//! Adapters translate these into their own wire format, so field names here do not
//! follow any particular provider.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    /// Wire name shared by every supported backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One role-tagged text turn.
///
/// The order of messages in a request is the conversation order and is forwarded to
/// the backend unchanged.
///
/// # Examples
///
/// ```
/// use any_llm_client::types::{Message, MessageRole};
///
/// let messages = [Message::system("You are an assistant"), Message::user("Hi!")];
/// assert_eq!(messages[0].role, MessageRole::System);
/// assert_eq!(messages[1].text, "Hi!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub text: String,
}

impl Message {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }
}

/// Generation parameters attached to a single call.
///
/// `extra` is forwarded opaquely into the request body of backends that accept
/// free-form parameters; nothing here is validated beyond its type. Keys the adapter
/// sets itself, such as the stream flag or the messages, take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default)]
    pub extra: HashMap<String, Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            extra: HashMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Adds a backend parameter such as `top_p` or `max_tokens`.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}
