//! Signup link scanning over channel history.
//!
//! Pages backward through a channel's recent messages and extracts the first
//! raid-helper event reference it can find. The scan is bounded: at most
//! `window` messages are inspected, in pages of at most [`PAGE_LIMIT`].

use fancy_regex::Regex;
use serenity::async_trait;

use crate::common::error::RosterResult;

/// Maximum messages per history page.
pub const PAGE_LIMIT: u8 = 100;

/// A message reduced to the fields the scanner inspects.
#[derive(Debug, Clone, Default)]
pub struct ScannedMessage {
    pub id: u64,
    pub content: String,
    pub embeds: Vec<ScannedEmbed>,
    /// URLs of link-style buttons attached to the message.
    pub component_urls: Vec<String>,
}

/// The searchable parts of a rich embed.
#[derive(Debug, Clone, Default)]
pub struct ScannedEmbed {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// (name, value) pairs in embed order.
    pub fields: Vec<(String, String)>,
    pub author_url: Option<String>,
    pub footer_text: Option<String>,
}

/// A paged, newest-to-oldest view of a channel's history.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch up to `limit` messages older than `before` (or the newest
    /// messages when `before` is `None`), newest first.
    async fn fetch_page(&self, limit: u8, before: Option<u64>) -> RosterResult<Vec<ScannedMessage>>;
}

/// Extracts the first event reference from a bounded history window.
pub struct LinkScanner {
    pattern: Regex,
}

impl Default for LinkScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkScanner {
    pub fn new() -> Self {
        Self {
            // Raid-helper always embeds the event URL somewhere in its post.
            pattern: Regex::new(r"raid-helper\.dev/event/(\d+)").unwrap(),
        }
    }

    /// Scan up to `window` messages, newest to oldest, returning the first
    /// event id found or `None` if the window is exhausted.
    ///
    /// Paging stops early when the source returns a short page, which signals
    /// that the channel has no older messages.
    pub async fn find_reference(
        &self,
        source: &dyn HistorySource,
        window: usize,
    ) -> RosterResult<Option<String>> {
        let mut seen = 0usize;
        let mut before: Option<u64> = None;

        while seen < window {
            let limit = (window - seen).min(PAGE_LIMIT as usize) as u8;
            let page = source.fetch_page(limit, before).await?;
            if page.is_empty() {
                break;
            }

            for message in &page {
                if let Some(event_id) = self.extract_from_message(message) {
                    return Ok(Some(event_id));
                }
            }

            seen += page.len();
            before = page.last().map(|m| m.id);
            if page.len() < limit as usize {
                break;
            }
        }

        Ok(None)
    }

    /// Inspect a single message's fields in priority order, first match wins.
    fn extract_from_message(&self, message: &ScannedMessage) -> Option<String> {
        if let Some(id) = self.extract_id(&message.content) {
            return Some(id);
        }

        for embed in &message.embeds {
            let direct = [
                embed.url.as_deref(),
                embed.title.as_deref(),
                embed.description.as_deref(),
            ];
            for text in direct.into_iter().flatten() {
                if let Some(id) = self.extract_id(text) {
                    return Some(id);
                }
            }
            for (name, value) in &embed.fields {
                if let Some(id) = self.extract_id(name) {
                    return Some(id);
                }
                if let Some(id) = self.extract_id(value) {
                    return Some(id);
                }
            }
            for text in [embed.author_url.as_deref(), embed.footer_text.as_deref()]
                .into_iter()
                .flatten()
            {
                if let Some(id) = self.extract_id(text) {
                    return Some(id);
                }
            }
        }

        for url in &message.component_urls {
            if let Some(id) = self.extract_id(url) {
                return Some(id);
            }
        }

        None
    }

    fn extract_id(&self, text: &str) -> Option<String> {
        self.pattern
            .captures(text)
            .ok()
            .flatten()
            .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
    }
}
