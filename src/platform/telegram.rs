use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{FileId, MessageId, ReplyParameters};
use tracing::{debug, info, warn};

use crate::commands;
use crate::extract::keywords;
use crate::gate;
use crate::pipeline::InvitationPipeline;
use crate::platform::{
    BotIdentity, InboundMessage, MediaPayload, MediaRef, MediaSource, ReplySender, ReplyTarget,
};
use crate::text;

/// Shared state handed to every update handler
pub struct AppState {
    pub pipeline: InvitationPipeline,
    pub identity: BotIdentity,
    pub started_at: Instant,
}

/// Media download and reply sending over the Bot API
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MediaSource for TelegramGateway {
    async fn download(&self, message: &InboundMessage) -> Result<Option<MediaPayload>> {
        let Some(media) = &message.media else {
            return Ok(None);
        };

        let file = self
            .bot
            .get_file(FileId(media.file_id.clone()))
            .await
            .with_context(|| format!("Failed to look up file {}", media.file_id))?;
        let mut bytes: Vec<u8> = Vec::new();
        self.bot
            .download_file(&file.path, &mut bytes)
            .await
            .with_context(|| format!("Failed to download file {}", file.path))?;

        debug!(file = %media.file_id, size = bytes.len(), "Downloaded media");
        Ok(Some(MediaPayload {
            bytes,
            mime_type: media.mime_type.clone(),
        }))
    }
}

#[async_trait]
impl ReplySender for TelegramGateway {
    async fn send(&self, target: &ReplyTarget, text: &str) -> Result<()> {
        let chat_id: i64 = target
            .chat_id
            .parse()
            .with_context(|| format!("Invalid chat id: {}", target.chat_id))?;
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(id) = target.reply_to.as_deref().and_then(|id| id.parse().ok()) {
            request = request.reply_parameters(ReplyParameters::new(MessageId(id)));
        }
        request
            .await
            .with_context(|| format!("Failed to send reply to chat {}", chat_id))?;
        Ok(())
    }
}

/// Largest photo size, or a document declared as an image.
fn media_of(msg: &Message) -> Option<MediaRef> {
    let largest = msg
        .photo()
        .and_then(|sizes| sizes.iter().max_by_key(|p| p.width * p.height));
    if let Some(largest) = largest {
        return Some(MediaRef {
            file_id: largest.file.id.0.clone(),
            mime_type: "image/jpeg".to_string(),
        });
    }
    let document = msg.document()?;
    let mime_type = document.mime_type.as_ref()?.essence_str().to_string();
    Some(MediaRef {
        file_id: document.file.id.0.clone(),
        mime_type,
    })
}

/// Platform-agnostic view of a Telegram message
fn to_inbound(msg: &Message) -> Option<InboundMessage> {
    let user = msg.from.as_ref()?;
    let text = msg.text().or_else(|| msg.caption()).unwrap_or_default();

    Some(InboundMessage {
        sender_id: user.id.0.to_string(),
        sender_name: user.full_name(),
        chat_id: msg.chat.id.0.to_string(),
        message_id: Some(msg.id.0.to_string()),
        text: text.to_string(),
        media: media_of(msg),
        is_group: msg.chat.is_group() || msg.chat.is_supergroup(),
        is_broadcast: msg.chat.is_channel() || msg.sender_chat.is_some(),
    })
}

/// Run the Telegram dispatcher until shutdown
pub async fn run(state: Arc<AppState>, bot: Bot) -> Result<()> {
    info!("Starting Telegram platform...");

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(inbound) = to_inbound(&msg) else {
        return Ok(());
    };

    debug!(
        "Telegram message from {} ({}): {}",
        inbound.sender_name, inbound.sender_id, inbound.text
    );

    if inbound.sender_id != state.identity.user_id {
        if commands::is_start_command(&inbound.text) {
            bot.send_message(msg.chat.id, commands::START_TEXT).await?;
            return Ok(());
        }
        if commands::is_info_command(&inbound.text) {
            let reply = commands::info_reply(
                &state.identity,
                state.started_at.elapsed(),
                chrono::Local::now(),
            );
            bot.send_message(msg.chat.id, reply)
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
            return Ok(());
        }
    }

    // The reply delay must not hold up the dispatcher
    let gateway = TelegramGateway::new(bot);
    tokio::spawn(async move {
        let handled = state
            .pipeline
            .process(&inbound, &state.identity, &gateway, &gateway)
            .await;
        if handled || !should_greet(&inbound, &state.identity) {
            return;
        }
        let reply = commands::greeting_reply(&inbound.sender_name, &state.identity);
        if let Err(e) = gateway.send(&inbound.reply_target(), &reply).await {
            warn!("Failed to send greeting: {:#}", e);
        }
    });

    Ok(())
}

/// Greetings are answered only for eligible messages that are not invitations.
fn should_greet(inbound: &InboundMessage, identity: &BotIdentity) -> bool {
    gate::is_eligible(inbound, identity)
        && commands::is_greeting(&inbound.text)
        && !keywords::is_invitation(&text::normalize(&inbound.text))
}

/// Read the bot's own account once at startup.
pub async fn fetch_identity(bot: &Bot) -> Result<BotIdentity> {
    let me = bot.get_me().await.context("Failed to call getMe")?;
    let identity = BotIdentity {
        user_id: me.id.0.to_string(),
        display_name: me.first_name.clone(),
    };
    info!(
        "Bot identity: {} ({})",
        identity.display_name, identity.user_id
    );
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound(text: &str) -> InboundMessage {
        InboundMessage {
            sender_id: "1001".to_string(),
            sender_name: "Budi".to_string(),
            chat_id: "1001".to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    fn identity() -> BotIdentity {
        BotIdentity {
            user_id: "42".to_string(),
            display_name: "Sekretariat".to_string(),
        }
    }

    #[test]
    fn test_greets_plain_hello() {
        assert!(should_greet(&inbound("Halo pak"), &identity()));
    }

    #[test]
    fn test_no_greeting_for_invitations_or_groups() {
        assert!(!should_greet(
            &inbound("Halo, undangan rapat. Hari : Senin"),
            &identity()
        ));
        let mut group = inbound("Halo semua");
        group.is_group = true;
        assert!(!should_greet(&group, &identity()));
        assert!(!should_greet(&inbound("Selamat pagi"), &identity()));
    }
}
