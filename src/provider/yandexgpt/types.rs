use serde::Deserialize;

/// Body of a completion response and of every streaming line.
///
/// Only the fields the client reads are modeled; `usage` and `modelVersion` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct YandexGptResponse {
    pub(crate) result: YandexGptResult,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct YandexGptResult {
    pub(crate) alternatives: Vec<YandexGptAlternative>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct YandexGptAlternative {
    pub(crate) message: YandexGptMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct YandexGptMessage {
    pub(crate) text: String,
}
