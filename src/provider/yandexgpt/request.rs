use serde_json::{Map, Value, json};

use crate::config::YandexGptConfig;
use crate::types::{Message, RequestOptions};

pub(crate) fn build_yandexgpt_body(
    config: &YandexGptConfig,
    messages: &[Message],
    options: &RequestOptions,
    stream: bool,
) -> Value {
    let mut body: Map<String, Value> = options
        .extra
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    body.insert("modelUri".to_string(), Value::String(config.model_uri()));
    body.insert(
        "completionOptions".to_string(),
        json!({
            "stream": stream,
            "temperature": options.temperature,
            "maxTokens": config.max_tokens,
        }),
    );
    body.insert(
        "messages".to_string(),
        Value::Array(
            messages
                .iter()
                .map(|message| json!({"role": message.role.as_str(), "text": message.text}))
                .collect(),
        ),
    );
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_keeps_message_order_and_stream_flag() {
        let config = YandexGptConfig::new("Api-Key k", "folder", "yandexgpt-lite")
            .with_max_tokens(100);
        let messages = [
            Message::system("You are an assistant"),
            Message::user("Hi!"),
            Message::assistant("Hello"),
        ];
        let options = RequestOptions::default().with_temperature(0.1);

        let body = build_yandexgpt_body(&config, &messages, &options, true);

        assert_eq!(body["modelUri"], "gpt://folder/yandexgpt-lite/latest");
        assert_eq!(
            body["completionOptions"],
            json!({"stream": true, "temperature": 0.1, "maxTokens": 100})
        );
        assert_eq!(
            body["messages"],
            json!([
                {"role": "system", "text": "You are an assistant"},
                {"role": "user", "text": "Hi!"},
                {"role": "assistant", "text": "Hello"},
            ])
        );
    }

    #[test]
    fn extra_options_are_forwarded() {
        let config = YandexGptConfig::new("Api-Key k", "folder", "yandexgpt");
        let options = RequestOptions::default().with_extra("reasoningOptions", json!({"mode": "DISABLED"}));
        let body = build_yandexgpt_body(&config, &[], &options, false);
        assert_eq!(body["reasoningOptions"], json!({"mode": "DISABLED"}));
        assert_eq!(body["completionOptions"]["stream"], false);
    }

    #[test]
    fn extra_options_cannot_replace_request_fields() {
        let config = YandexGptConfig::new("Api-Key k", "folder", "yandexgpt");
        let options = RequestOptions::default()
            .with_extra("completionOptions", json!({"maxTokens": 5}))
            .with_extra("messages", json!([]))
            .with_extra("modelUri", json!("gpt://other/model"));
        let body = build_yandexgpt_body(&config, &[Message::user("Hi!")], &options, true);

        assert_eq!(body["completionOptions"]["stream"], true);
        assert_eq!(body["completionOptions"]["maxTokens"], 7400);
        assert_eq!(body["modelUri"], "gpt://folder/yandexgpt/latest");
        assert_eq!(body["messages"], json!([{"role": "user", "text": "Hi!"}]));
    }
}
