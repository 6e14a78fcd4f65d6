use crate::platform::{BotIdentity, InboundMessage};

/// Telegram service accounts that relay system or anonymous posts:
/// the notifications account, GroupAnonymousBot and Channel_Bot.
const SYSTEM_SENDERS: &[&str] = &["777000", "1087968824", "136817688"];

/// Whether a message may enter invitation processing.
///
/// Runs before any OCR or pattern matching so the bot never answers
/// itself, a broadcast, or a group conversation.
pub fn is_eligible(message: &InboundMessage, identity: &BotIdentity) -> bool {
    if message.sender_id.is_empty() || message.sender_id == identity.user_id {
        return false;
    }
    if message.is_broadcast || SYSTEM_SENDERS.contains(&message.sender_id.as_str()) {
        return false;
    }
    !message.is_group
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> BotIdentity {
        BotIdentity {
            user_id: "42".to_string(),
            display_name: "Sekretariat".to_string(),
        }
    }

    fn message_from(sender: &str) -> InboundMessage {
        InboundMessage {
            sender_id: sender.to_string(),
            chat_id: sender.to_string(),
            text: "Undangan *Rapat RT*".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_private_message_is_eligible() {
        assert!(is_eligible(&message_from("1001"), &identity()));
    }

    #[test]
    fn test_own_message_is_rejected() {
        assert!(!is_eligible(&message_from("42"), &identity()));
    }

    #[test]
    fn test_broadcast_is_rejected() {
        let mut msg = message_from("1001");
        msg.is_broadcast = true;
        assert!(!is_eligible(&msg, &identity()));
        assert!(!is_eligible(&message_from("777000"), &identity()));
    }

    #[test]
    fn test_group_is_rejected() {
        let mut msg = message_from("1001");
        msg.is_group = true;
        assert!(!is_eligible(&msg, &identity()));
    }

    #[test]
    fn test_missing_sender_is_rejected() {
        assert!(!is_eligible(&message_from(""), &identity()));
    }
}
