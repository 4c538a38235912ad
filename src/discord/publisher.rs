//! Idempotent artifact publishing.
//!
//! Each output destination is a single bot-authored message that gets edited
//! in place on every run. The publisher owns the last-known message id for
//! its destination; when the id is missing or stale it creates one
//! placeholder message, adopts its id, and surfaces it so the operator can
//! persist it in config. It never creates a second message while a working
//! id is known.

use std::sync::Arc;

use serenity::all::{ChannelId, CreateMessage, EditMessage, Http, MessageId, UserId};
use serenity::async_trait;
use tracing::{debug, info, warn};

use crate::common::error::{PublishError, PublishResult};

/// Text of a freshly created destination message, immediately overwritten
/// by the first edit.
const PLACEHOLDER: &str = "…";

/// The create-or-edit capability for one destination.
#[async_trait]
pub trait PublishTarget: Send + Sync {
    fn channel(&self) -> u64;

    /// Whether message `id` exists at the destination and we authored it.
    async fn is_own_message(&self, id: u64) -> PublishResult<bool>;

    /// Create a new message, returning its id.
    async fn create(&self, text: &str) -> PublishResult<u64>;

    /// Replace the content of message `id`.
    async fn edit(&self, id: u64, text: &str) -> PublishResult<()>;
}

/// Result of one publish: where the artifact landed and whether a new
/// destination message had to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOutcome {
    pub message_id: u64,
    pub created: bool,
}

/// Publishes one artifact to one destination, edit-in-place.
pub struct Publisher {
    /// Destination name for logs ("dashboard", "recruitment").
    name: &'static str,
    /// Last-known authored message id. This mapping is owned here and
    /// nowhere else.
    message_id: Option<u64>,
}

impl Publisher {
    /// `initial_id` comes from config: the message created on some earlier
    /// run, if the operator persisted it.
    pub fn new(name: &'static str, initial_id: Option<u64>) -> Self {
        Self {
            name,
            message_id: initial_id,
        }
    }

    pub fn message_id(&self) -> Option<u64> {
        self.message_id
    }

    /// Write `text` to the destination.
    ///
    /// Tries the known message first; not-found and wrong-author both fall
    /// through to the create path. A newly created id becomes authoritative
    /// and is logged for the operator to persist.
    pub async fn publish(
        &mut self,
        target: &dyn PublishTarget,
        text: &str,
    ) -> PublishResult<PublishOutcome> {
        if let Some(id) = self.message_id {
            match target.is_own_message(id).await {
                Ok(true) => {
                    target.edit(id, text).await?;
                    debug!("Updated {} message {}", self.name, id);
                    return Ok(PublishOutcome {
                        message_id: id,
                        created: false,
                    });
                }
                Ok(false) => {
                    warn!(
                        "Known {} message {} is gone or not ours, creating a new one",
                        self.name, id
                    );
                }
                Err(e) => {
                    warn!(
                        "Could not fetch {} message {} ({}), creating a new one",
                        self.name, id, e
                    );
                }
            }
        }

        let id = target.create(PLACEHOLDER).await.map_err(|e| {
            warn!("Failed to create {} message: {}", self.name, e);
            PublishError::TargetUnresolvable {
                channel: target.channel(),
            }
        })?;
        self.message_id = Some(id);
        info!(
            "Created {} message {} in channel {} - persist it as outputs.{}.message_id",
            self.name,
            id,
            target.channel(),
            self.name
        );

        target.edit(id, text).await?;
        Ok(PublishOutcome {
            message_id: id,
            created: true,
        })
    }
}

/// Serenity-backed publish target for a channel.
pub struct ChannelTarget {
    http: Arc<Http>,
    channel: ChannelId,
    self_id: UserId,
}

impl ChannelTarget {
    pub fn new(http: Arc<Http>, channel: ChannelId, self_id: UserId) -> Self {
        Self {
            http,
            channel,
            self_id,
        }
    }
}

#[async_trait]
impl PublishTarget for ChannelTarget {
    fn channel(&self) -> u64 {
        self.channel.get()
    }

    async fn is_own_message(&self, id: u64) -> PublishResult<bool> {
        match self.channel.message(&self.http, MessageId::new(id)).await {
            Ok(message) => Ok(message.author.id == self.self_id),
            // Deleted messages come back as an HTTP error; treat every
            // fetch failure as "not ours" so the create path can run.
            Err(e) => {
                debug!("Message fetch for {} failed: {}", id, e);
                Ok(false)
            }
        }
    }

    async fn create(&self, text: &str) -> PublishResult<u64> {
        let message = self
            .channel
            .send_message(&self.http, CreateMessage::new().content(text))
            .await?;
        Ok(message.id.get())
    }

    async fn edit(&self, id: u64, text: &str) -> PublishResult<()> {
        self.channel
            .edit_message(&self.http, MessageId::new(id), EditMessage::new().content(text))
            .await?;
        Ok(())
    }
}
