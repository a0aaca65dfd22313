use std::env;
use std::io::Write;

use any_llm_client::http::reqwest::dyn_transport;
use any_llm_client::{
    AnyLLMConfig, Message, RequestOptions, RequestRetryConfig, YandexGptConfig, get_client,
};
use futures_util::StreamExt;
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
        Message::user("Write a haiku about the Rust borrow checker."),
    ];
    let mut stream = client
        .stream_llm_partial_messages(&messages, &RequestOptions::default().with_temperature(0.6))
        .await?;

    let mut stdout = std::io::stdout();
    while let Some(partial) = stream.next().await {
        let partial = partial?;
        write!(stdout, "\r{partial}")?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}
