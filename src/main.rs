//! openai-chat - stream one chat completion from the command line
//!
//! Prints content fragments as they arrive, then the assembled message as
//! JSON once the stream ends.

use std::io::Write;

use anyhow::{bail, Result};
use futures::StreamExt;
use tokio::signal;
use tracing::{info, warn};

use openai_client::{ChatCompletionRequest, ChatMessage, Config, MessageAssembler, OpenAIClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openai_client=info".into()),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let prompt = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if prompt.trim().is_empty() {
        bail!("usage: openai-chat <prompt>");
    }

    let config = Config::from_env()?;
    info!(model = %config.model, "Configuration loaded");

    let client = OpenAIClient::from_config(&config)?;
    let request = ChatCompletionRequest::new(config.model.clone(), vec![ChatMessage::user(prompt)]);

    let mut stream = client.chat_completions_stream(&request).await?;
    let mut assembler = MessageAssembler::new();
    let mut stdout = std::io::stdout();

    let interrupted = tokio::select! {
        result = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                // Only the first choice is shown
                if let Some(choice) = chunk.choices.iter().find(|c| c.index == 0) {
                    if let Some(ref text) = choice.delta.content {
                        write!(stdout, "{}", text)?;
                        stdout.flush()?;
                    }
                    assembler.merge_chunk(choice);
                }
            }
            anyhow::Ok(())
        } => {
            result?;
            false
        }
        _ = signal::ctrl_c() => {
            warn!("Received Ctrl+C, printing partial message");
            true
        }
    };

    writeln!(stdout)?;
    let message = assembler.finish();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&message)?)?;

    if interrupted {
        bail!("interrupted");
    }
    Ok(())
}
