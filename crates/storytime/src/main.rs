//! Storytime CLI binary.
//!
//! Asks for a topic, then lets the reader steer a children's story from a
//! nine-option menu until they exit.

use clap::Parser;
use std::sync::Arc;
use storytime::{Console, LoggingConfig, OpenAIDriver, StorytimeConfig, init_logging};
use tracing::{info, warn};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();

    let _ = dotenvy::dotenv();

    init_logging(&LoggingConfig::new(cli.verbose).with_json_logs(cli.json_logs))?;

    let mut config = StorytimeConfig::load(cli.config.as_deref())?;
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }
    if let Some(max_attempts) = cli.max_attempts {
        config = config.with_max_attempts(max_attempts);
    }
    config.validate()?;

    let driver = Arc::new(OpenAIDriver::from_env(&config.model)?);
    info!(model = %config.model.model, "Starting session");
    let mut session = config.build_session(driver)?;

    // First Ctrl-C abandons the model call in flight, the second quits.
    let token = session.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing up. Press Ctrl-C again to quit immediately.");
            token.cancel();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let stdin = std::io::stdin();
    let mut console = Console::new(stdin.lock(), std::io::stdout());
    console.run(&mut session).await?;

    Ok(())
}
