use crate::error::LLMError;
use crate::provider::parse_json;

use super::types::YandexGptResponse;

/// Text of the first alternative; an empty list violates the API contract.
pub(crate) fn first_alternative_text(
    provider: &'static str,
    body: &[u8],
) -> Result<String, LLMError> {
    let response: YandexGptResponse = parse_json(provider, body)?;
    response
        .result
        .alternatives
        .into_iter()
        .next()
        .map(|alternative| alternative.message.text)
        .ok_or_else(|| LLMError::invalid_response(provider, "result contains no alternatives"))
}
