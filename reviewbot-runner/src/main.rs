//! Reviewbot Runner
//!
//! Relays homework review verdicts to a Telegram chat.
//!
//! Architecture:
//! - Configuration: secrets and tuning from the environment / `.env`
//! - Repositories: HTTP access to the review API and the Telegram Bot API
//! - Services: formatting and delivery of notifications
//! - Scheduler: the long-poll loop and its reconnect backoff
//!
//! The runner long-polls the review API, sends one chat message per new
//! verdict and keeps going until the process is stopped or a fatal API
//! error occurs.

mod config;
mod repository;
mod scheduler;
mod service;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repository::{HttpReviewRepository, TelegramMessageRepository};
use crate::scheduler::PollLoop;
use crate::service::NotificationService;
use reviewbot_client::{ReviewClient, TelegramClient};

#[derive(Parser)]
#[command(name = "reviewbot")]
#[command(about = "Relays homework review verdicts to Telegram", long_about = None)]
struct Cli {
    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "PATH", env = "REVIEWBOT_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Do not send the greeting message at startup
    #[arg(long)]
    no_greeting: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Seed the environment before anything reads it, RUST_LOG included
    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reviewbot_runner=info,reviewbot_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Reviewbot Runner");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: chat_id={}, review_api={}, poll_timeout={:?}",
        config.chat_id, config.devman_api_url, config.poll_timeout
    );

    // Initialize clients
    let review_client = ReviewClient::new(&config.devman_api_url, &config.devman_token)
        .with_timeout(config.poll_timeout);
    let telegram_client = TelegramClient::new(&config.telegram_api_url, &config.telegram_token)
        .with_timeout(config.telegram_timeout);

    let chat = telegram_client
        .get_chat(config.chat_id)
        .await
        .context("Failed to look up the recipient chat")?;
    let recipient = chat.display_name().to_string();
    info!("Notifications go to {} (chat {})", recipient, chat.id);

    // Initialize services
    let messages = Arc::new(TelegramMessageRepository::new(
        telegram_client,
        config.chat_id,
    ));
    let notifications = NotificationService::new(messages, recipient);

    if cli.no_greeting {
        info!("Greeting disabled");
    } else {
        notifications
            .greet()
            .await
            .context("Failed to send the greeting message")?;
    }

    let reviews = Arc::new(HttpReviewRepository::new(review_client));
    let mut poller = PollLoop::new(reviews, notifications, config.backoff);

    if let Err(e) = poller.run().await {
        error!("Poller error: {:#}", e);
        return Err(e);
    }

    Ok(())
}

/// Loads and validates configuration from the environment
fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Invalid configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
