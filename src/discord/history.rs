//! Serenity-backed channel history reads for the link scanner.

use std::sync::Arc;

use serenity::all::{
    ActionRowComponent, ButtonKind, ChannelId, GetMessages, Http, Message, MessageId,
};
use serenity::async_trait;

use crate::common::error::RosterResult;
use crate::roster::scanner::{HistorySource, ScannedEmbed, ScannedMessage};

/// Pages backward through one channel's message history.
pub struct ChannelHistory {
    http: Arc<Http>,
    channel: ChannelId,
}

impl ChannelHistory {
    pub fn new(http: Arc<Http>, channel: ChannelId) -> Self {
        Self { http, channel }
    }
}

#[async_trait]
impl HistorySource for ChannelHistory {
    async fn fetch_page(&self, limit: u8, before: Option<u64>) -> RosterResult<Vec<ScannedMessage>> {
        let mut request = GetMessages::new().limit(limit);
        if let Some(id) = before {
            request = request.before(MessageId::new(id));
        }

        let messages = self.channel.messages(&self.http, request).await?;
        Ok(messages.into_iter().map(to_scanned).collect())
    }
}

/// Reduce a gateway message to the fields the scanner inspects.
fn to_scanned(message: Message) -> ScannedMessage {
    let component_urls = message
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .filter_map(|component| match component {
            ActionRowComponent::Button(button) => match &button.data {
                ButtonKind::Link { url } => Some(url.clone()),
                _ => None,
            },
            _ => None,
        })
        .collect();

    ScannedMessage {
        id: message.id.get(),
        content: message.content,
        embeds: message
            .embeds
            .into_iter()
            .map(|embed| ScannedEmbed {
                url: embed.url,
                title: embed.title,
                description: embed.description,
                fields: embed
                    .fields
                    .into_iter()
                    .map(|field| (field.name, field.value))
                    .collect(),
                author_url: embed.author.and_then(|author| author.url),
                footer_text: embed.footer.map(|footer| footer.text),
            })
            .collect(),
        component_urls,
    }
}
