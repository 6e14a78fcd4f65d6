pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

/// A message received from the chat platform
#[derive(Debug, Clone, Default)]
pub struct InboundMessage {
    /// Platform-specific sender ID as string
    pub sender_id: String,
    /// Display name of the sender
    pub sender_name: String,
    /// Chat the message arrived in; replies go back here
    pub chat_id: String,
    /// Platform message ID, used to quote the original when replying
    pub message_id: Option<String>,
    /// Message text (or caption for media messages)
    pub text: String,
    /// Attached media, if any. The payload is fetched on demand.
    pub media: Option<MediaRef>,
    /// Sent inside a group conversation
    pub is_group: bool,
    /// Sent by a channel/broadcast or system account
    pub is_broadcast: bool,
}

impl InboundMessage {
    pub fn reply_target(&self) -> ReplyTarget {
        ReplyTarget {
            chat_id: self.chat_id.clone(),
            reply_to: self.message_id.clone(),
        }
    }
}

/// Handle to media attached to an inbound message
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRef {
    pub file_id: String,
    /// Declared MIME type, e.g. "image/jpeg"
    pub mime_type: String,
}

impl MediaRef {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Downloaded media bytes together with their declared type
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// The bot's own account, used to drop echoes of its own messages
#[derive(Debug, Clone, Default)]
pub struct BotIdentity {
    pub user_id: String,
    pub display_name: String,
}

/// Where a reply is sent
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyTarget {
    pub chat_id: String,
    pub reply_to: Option<String>,
}

/// Fetches the media attached to a message
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Returns `Ok(None)` when the message carries no media.
    async fn download(&self, message: &InboundMessage) -> Result<Option<MediaPayload>>;
}

/// Sends text back to a conversation. May fail transiently.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send(&self, target: &ReplyTarget, text: &str) -> Result<()>;
}
