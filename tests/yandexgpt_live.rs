use std::env;

use any_llm_client::http::reqwest::dyn_transport;
use any_llm_client::{
    AnyLLMConfig, Message, RequestOptions, RequestRetryConfig, YandexGptConfig, get_client,
};
use dotenvy::dotenv;
use futures_util::StreamExt;

fn load_env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[tokio::test]
#[ignore = "requires valid YandexGPT credentials"]
async fn yandexgpt_live_message_and_stream() {
    let _ = dotenv();

    let Some(auth_header) = load_env_var("YANDEX_AUTH_HEADER") else {
        eprintln!("skip live test: YANDEX_AUTH_HEADER missing");
        return;
    };
    let Some(folder_id) = load_env_var("YANDEX_FOLDER_ID") else {
        eprintln!("skip live test: YANDEX_FOLDER_ID missing");
        return;
    };

    let config = AnyLLMConfig::YandexGpt(YandexGptConfig::new(auth_header, folder_id, "yandexgpt"));
    let client = get_client(
        &config,
        dyn_transport(reqwest::Client::new()),
        RequestRetryConfig::default(),
    )
    .expect("client");
    let messages = [
        Message::system("You are a helpful assistant."),
        Message::user("Please introduce Rust language in one sentence."),
    ];
    let options = RequestOptions::default().with_temperature(0.1);

    let response = client
        .request_llm_message(&messages, &options)
        .await
        .expect("request should succeed");
    assert!(!response.is_empty(), "response should contain text");

    let mut stream = client
        .stream_llm_partial_messages(&messages, &options)
        .await
        .expect("streaming should start");
    let mut previous = String::new();
    while let Some(partial) = stream.next().await {
        let partial = partial.expect("partial message should be valid");
        assert!(
            partial.len() >= previous.len(),
            "partial messages should grow: {previous:?} -> {partial:?}"
        );
        previous = partial;
    }
    assert!(!previous.is_empty(), "stream should yield at least one partial message");
}
