use crate::error::LLMError;
use crate::provider::parse_json;

use super::types::{OpenAiChatResponse, OpenAiStreamChunk};

pub(crate) fn first_choice_content(provider: &'static str, body: &[u8]) -> Result<String, LLMError> {
    let response: OpenAiChatResponse = parse_json(provider, body)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| LLMError::invalid_response(provider, "response contains no choices"))
}

/// Delta text of the first choice; empty when the chunk carries no content.
pub(crate) fn first_choice_delta(provider: &'static str, data: &[u8]) -> Result<String, LLMError> {
    let chunk: OpenAiStreamChunk = parse_json(provider, data)?;
    chunk
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.delta.content.unwrap_or_default())
        .ok_or_else(|| LLMError::invalid_response(provider, "stream chunk contains no choices"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice_content() {
        let body = br#"{"id":"chatcmpl-1","object":"chat.completion","model":"llama",
            "choices":[{"index":0,"message":{"role":"assistant","content":"Hello"},"finish_reason":"stop"}]}"#;
        assert_eq!(first_choice_content("openai", body).expect("text"), "Hello");
    }

    #[test]
    fn empty_choices_are_rejected() {
        let err = first_choice_content("openai", br#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, LLMError::InvalidResponse { provider: "openai", .. }));

        let err = first_choice_delta("openai", br#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, LLMError::InvalidResponse { provider: "openai", .. }));
    }

    #[test]
    fn null_content_is_rejected() {
        let body = br#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert!(first_choice_content("openai", body).is_err());
    }

    #[test]
    fn role_only_delta_is_empty() {
        let data = br#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#;
        assert_eq!(first_choice_delta("openai", data).expect("delta"), "");
    }
}
