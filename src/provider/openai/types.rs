use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OpenAiChatResponse {
    pub(crate) choices: Vec<OpenAiResponseChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OpenAiResponseChoice {
    pub(crate) message: OpenAiResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OpenAiResponseMessage {
    pub(crate) content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OpenAiStreamChunk {
    pub(crate) choices: Vec<OpenAiStreamChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OpenAiStreamChoice {
    pub(crate) delta: OpenAiStreamDelta,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OpenAiStreamDelta {
    /// Absent on role-only and finishing chunks.
    #[serde(default)]
    pub(crate) content: Option<String>,
}
