use serde_json::{Map, Value, json};

use crate::types::{Message, MessageRole, RequestOptions};

pub(crate) fn build_openai_body(
    model: &str,
    messages: &[Message],
    options: &RequestOptions,
    stream: bool,
    alternate_roles: bool,
) -> Value {
    let messages = if alternate_roles {
        alternate_user_assistant(messages)
    } else {
        messages
            .iter()
            .map(|message| (message.role, message.text.clone()))
            .collect()
    };

    let mut body: Map<String, Value> = options
        .extra
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    body.insert("model".to_string(), Value::String(model.to_string()));
    body.insert(
        "messages".to_string(),
        Value::Array(
            messages
                .into_iter()
                .map(|(role, content)| json!({"role": role.as_str(), "content": content}))
                .collect(),
        ),
    );
    body.insert("temperature".to_string(), Value::from(options.temperature));
    body.insert("stream".to_string(), Value::Bool(stream));
    Value::Object(body)
}

/// Rewrites a history so that user and assistant turns strictly alternate.
///
/// System turns count as user turns, consecutive turns of the same role are joined
/// with a blank line, and blank turns are dropped.
fn alternate_user_assistant(messages: &[Message]) -> Vec<(MessageRole, String)> {
    let mut merged: Vec<(MessageRole, Vec<&str>)> = Vec::new();
    for message in messages {
        if message.text.trim().is_empty() {
            continue;
        }
        let role = match message.role {
            MessageRole::System | MessageRole::User => MessageRole::User,
            MessageRole::Assistant => MessageRole::Assistant,
        };
        if let Some((last_role, chunks)) = merged.last_mut() {
            if *last_role == role {
                chunks.push(message.text.as_str());
                continue;
            }
        }
        merged.push((role, vec![message.text.as_str()]));
    }
    merged
        .into_iter()
        .map(|(role, chunks)| (role, chunks.join("\n\n")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_preserves_messages_and_stream_flag() {
        let messages = [Message::system("You are an assistant"), Message::user("Hi!")];
        let options = RequestOptions::default().with_extra("max_tokens", json!(64));
        let body = build_openai_body("llama", &messages, &options, true, false);

        assert_eq!(body["model"], "llama");
        assert_eq!(body["stream"], true);
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(
            body["messages"],
            json!([
                {"role": "system", "content": "You are an assistant"},
                {"role": "user", "content": "Hi!"},
            ])
        );
    }

    #[test]
    fn extra_options_cannot_replace_request_fields() {
        let options = RequestOptions::default()
            .with_extra("stream", json!(false))
            .with_extra("model", json!("other"))
            .with_extra("top_p", json!(0.5));
        let body = build_openai_body("llama", &[Message::user("Hi!")], &options, true, false);

        assert_eq!(body["stream"], true);
        assert_eq!(body["model"], "llama");
        assert_eq!(body["top_p"], 0.5);
        assert_eq!(body["messages"], json!([{"role": "user", "content": "Hi!"}]));
    }

    #[test]
    fn alternation_merges_same_role_runs() {
        let messages = [
            Message::system("Be brief."),
            Message::user("Hi!"),
            Message::assistant("Hello."),
            Message::assistant("How can I help?"),
            Message::user("   "),
            Message::user("Tell a joke."),
        ];
        let merged = alternate_user_assistant(&messages);
        assert_eq!(
            merged,
            vec![
                (MessageRole::User, "Be brief.\n\nHi!".to_string()),
                (MessageRole::Assistant, "Hello.\n\nHow can I help?".to_string()),
                (MessageRole::User, "Tell a joke.".to_string()),
            ]
        );
    }

    #[test]
    fn alternation_rewrites_system_after_assistant() {
        let messages = [Message::assistant("Hi"), Message::system("Stay polite.")];
        let body = build_openai_body("m", &messages, &RequestOptions::default(), false, true);
        assert_eq!(
            body["messages"],
            json!([
                {"role": "assistant", "content": "Hi"},
                {"role": "user", "content": "Stay polite."},
            ])
        );
    }
}
