//! Discord bot commands (!needs, !refresh, etc).
//!
//! Handles command parsing and execution for Discord commands.

use std::sync::Arc;

use serenity::model::channel::Message;
use serenity::prelude::*;
use tracing::{debug, info};

use crate::discord::bot::Refresher;

/// Command handler for Discord bot.
pub struct CommandHandler {
    refresher: Arc<Refresher>,
}

impl CommandHandler {
    pub fn new(refresher: Arc<Refresher>) -> Self {
        Self { refresher }
    }

    /// Parse and execute a command from Discord.
    ///
    /// Returns `true` if the message was a command, `false` otherwise.
    pub async fn handle_command(
        &self,
        ctx: &Context,
        msg: &Message,
        content: &str,
    ) -> anyhow::Result<bool> {
        // Long messages are never commands here; skip them before parsing
        // so pasted walls of text starting with '!' are not inspected.
        if content.len() > 100 {
            return Ok(false);
        }
        if !content.starts_with('!') {
            return Ok(false);
        }

        let command = content[1..]
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_lowercase();

        debug!("Processing command: {}", command);

        match command.as_str() {
            "needs" | "refresh" => {
                self.handle_refresh(ctx, msg).await?;
                Ok(true)
            }
            "help" => {
                self.handle_help(ctx, msg).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Handle !needs / !refresh: run the pipeline now unless a run is
    /// already in flight.
    async fn handle_refresh(&self, ctx: &Context, msg: &Message) -> anyhow::Result<()> {
        info!("!refresh command from {}", msg.author.name);

        msg.react(&ctx.http, '🔄').await.ok();

        match self.refresher.try_refresh(ctx).await {
            Some(report) => {
                msg.channel_id.say(&ctx.http, report.summary()).await?;
            }
            None => {
                msg.channel_id
                    .say(&ctx.http, "Already refreshing - try again in a moment.")
                    .await?;
            }
        }

        Ok(())
    }

    /// Handle !help command.
    async fn handle_help(&self, ctx: &Context, msg: &Message) -> anyhow::Result<()> {
        let help_text = r#"**Available Commands:**
• `!needs` / `!refresh` - Rebuild and republish the roster needs report
• `!help` - Show this help message"#;

        msg.channel_id.say(&ctx.http, help_text).await?;
        Ok(())
    }
}
