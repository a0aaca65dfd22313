use std::sync::Arc;

use any_llm_client::http::reqwest::dyn_transport;
use any_llm_client::{
    AnyLLMConfig, Message, MockLLMConfig, RequestOptions, RequestRetryConfig, get_client,
};
use futures_util::StreamExt;

fn mock_config() -> MockLLMConfig {
    MockLLMConfig {
        response_message: "canned answer".to_string(),
        stream_messages: vec!["c".to_string(), "ca".to_string(), "can".to_string()],
    }
}

#[tokio::test]
async fn mock_client_request_llm_message_returns_config_value() {
    let config = AnyLLMConfig::Mock(mock_config());
    let client = get_client(
        &config,
        dyn_transport(reqwest::Client::new()),
        RequestRetryConfig::default(),
    )
    .expect("client");

    let response = client
        .request_llm_message(&[Message::user("anything")], &RequestOptions::default())
        .await
        .expect("mock response");
    assert_eq!(response, "canned answer");
}

#[tokio::test]
async fn mock_client_stream_returns_config_values() {
    let config: AnyLLMConfig = serde_json::from_value(serde_json::json!({
        "api_type": "mock",
        "stream_messages": ["c", "ca", "can"],
    }))
    .expect("config");
    let client = get_client(
        &config,
        dyn_transport(reqwest::Client::new()),
        RequestRetryConfig::default(),
    )
    .expect("client");

    let stream = client
        .stream_llm_partial_messages(&[], &RequestOptions::default())
        .await
        .expect("mock stream");
    let items: Vec<String> = stream.map(|item| item.expect("ok")).collect().await;
    assert_eq!(items, mock_config().stream_messages);
}

#[tokio::test]
async fn clients_are_shareable_across_tasks() {
    let client = get_client(
        &AnyLLMConfig::Mock(mock_config()),
        dyn_transport(reqwest::Client::new()),
        RequestRetryConfig::default(),
    )
    .expect("client");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                client
                    .request_llm_message(&[Message::user("Hi!")], &RequestOptions::default())
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.expect("join").expect("response"), "canned answer");
    }
}
