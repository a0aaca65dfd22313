use std::env;

use any_llm_client::http::reqwest::dyn_transport;
use any_llm_client::{
    AnyLLMConfig, LLMError, Message, RequestOptions, RequestRetryConfig, YandexGptConfig,
    get_client,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AnyLLMConfig::YandexGpt(YandexGptConfig::new(
        env::var("YANDEX_AUTH_HEADER")?,
        env::var("YANDEX_FOLDER_ID")?,
        "yandexgpt",
    ));
    let client = get_client(
        &config,
        dyn_transport(reqwest::Client::new()),
        RequestRetryConfig::default(),
    )?;

    let messages = [
        Message::system("You are a helpful assistant."),
        Message::user("Explain what a context window is in two sentences."),
    ];
    match client
        .request_llm_message(&messages, &RequestOptions::default())
        .await
    {
        Ok(answer) => println!("{answer}"),
        Err(err) if err.is_out_of_tokens_or_symbols() => {
            eprintln!("prompt is too long for the model: {err}");
        }
        Err(err @ LLMError::RetriesExhausted { .. }) => {
            eprintln!("backend unavailable: {err}");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
