//! Quartermaster - Discord raid-roster needs aggregator
//!
//! Scans team channels for raid-helper signup links, aggregates the signups
//! into canonical role counts, and keeps a needs dashboard and a recruitment
//! post pinned up to date in two fixed channels.

mod common;
mod config;
mod discord;
mod roster;

use anyhow::Result;
use serenity::prelude::*;
use tokio::signal;
use tracing::{error, info};

use config::{env::get_config_path, load_and_validate};
use discord::Handler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Quartermaster v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);

    let config = load_and_validate(&config_path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        error!("Please ensure {} exists and is properly formatted.", config_path);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Teams: {}", config.roster.teams.len());
    for team in &config.roster.teams {
        info!("    {} -> channel {}", team.key, team.channel);
    }
    info!("  Dashboard channel: {}", config.outputs.dashboard.channel);
    info!("  Recruitment channel: {}", config.outputs.recruitment.channel);
    info!("  Refresh interval: {} minutes", config.roster.refresh_minutes());

    let token = config.discord.token.clone();
    let handler = Handler::new(config)?;

    // Message content is needed for the !refresh command and the link scan.
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .await?;

    info!("Starting Discord client...");
    tokio::select! {
        result = client.start() => {
            if let Err(e) = result {
                error!("Discord client error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            client.shard_manager.shutdown_all().await;
        }
    }

    info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
