//! Small direct-reply commands that sit next to the invitation pipeline.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, Local, Timelike};
use regex::Regex;

use crate::platform::BotIdentity;

pub const START_TEXT: &str = "Halo! Teruskan undangan rapat atau acara (teks atau foto) \
    ke sini dan saya akan membalas dengan konfirmasi kehadiran.\n\n\
    Perintah:\n\
    /info - Status bot dan uptime";

static GREETING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:hai|halo|hallo|helo|hello|hi)\b").unwrap());

/// `!info` or `/info`, optionally addressed as `/info@botname`.
pub fn is_info_command(text: &str) -> bool {
    let text = text.trim();
    let command = text.split('@').next().unwrap_or(text);
    command.eq_ignore_ascii_case("!info") || command.eq_ignore_ascii_case("/info")
}

pub fn is_start_command(text: &str) -> bool {
    let text = text.trim();
    text == "/start" || text.starts_with("/start ") || text.starts_with("/start@")
}

pub fn is_greeting(text: &str) -> bool {
    GREETING.is_match(text)
}

pub fn greeting_reply(sender_name: &str, identity: &BotIdentity) -> String {
    let sender = if sender_name.trim().is_empty() {
        "Bapak/Ibu"
    } else {
        sender_name.trim()
    };
    format!("Hai {}, Anda telah menghubungi {}!", sender, identity.display_name)
}

/// `H hours, M minutes, S seconds`
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    format!(
        "{} hours, {} minutes, {} seconds",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

fn time_of_day_greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good Morning!",
        12..=17 => "Good Afternoon!",
        18..=21 => "Good Evening!",
        _ => "Good Night!",
    }
}

/// Status report for the info command.
pub fn info_reply(identity: &BotIdentity, uptime: Duration, now: DateTime<Local>) -> String {
    format!(
        "_{}_\n\n\
         For your information, this Telegram bot is *active*\n\n\
         _Bot Info:_\n\
         \x20 *Name:* {}\n\
         \x20 *ID:* {}\n\
         \x20 *Server Uptime:* {}\n\n\
         Reported on {}",
        time_of_day_greeting(now.hour()),
        identity.display_name,
        identity.user_id,
        format_uptime(uptime),
        now.format("%a, %m/%d/%Y, %I:%M %p")
    )
}
