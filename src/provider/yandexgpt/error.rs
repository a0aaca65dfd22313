use crate::error::{LLMError, classify_status_error};

const TOKEN_LIMIT_HINT: &str = "number of input tokens must be no more than";
const TEXT_LENGTH_HINTS: [&str; 2] = ["text length is", "which is outside the range"];

/// YandexGPT reports oversized input with a 400 and one of two phrasings.
fn is_out_of_tokens_or_symbols(status: u16, body: &str) -> bool {
    status == 400
        && (body.contains(TOKEN_LIMIT_HINT)
            || TEXT_LENGTH_HINTS.iter().all(|hint| body.contains(hint)))
}

pub(crate) fn parse_yandexgpt_error(status: u16, body: String) -> LLMError {
    classify_status_error("yandexgpt", status, body, is_out_of_tokens_or_symbols)
}
