use crate::error::{LLMError, classify_status_error};

/// Phrase vLLM uses when the prompt exceeds the model context.
const CONTEXT_OVERFLOW_HINT: &str = "Please reduce the length of the messages";

fn is_out_of_tokens_or_symbols(status: u16, body: &str) -> bool {
    status == 400 && body.contains(CONTEXT_OVERFLOW_HINT)
}

pub(crate) fn parse_openai_error(status: u16, body: String) -> LLMError {
    classify_status_error("openai", status, body, is_out_of_tokens_or_symbols)
}
