use std::sync::LazyLock;

use regex::Regex;

/// Qualitative part of the day that may follow (or precede) a clock value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Morning,
    Midday,
    Afternoon,
    Night,
}

static CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{1,2})(?:\s?[.:]\s?(\d{2}))?(?:\D|$)").unwrap()
});

/// A clock reading: `19.30`, `jam 8` or `4 sore`. A day number in a date
/// is not one.
static CLOCK_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?:^|[^\d.:/-])\d{1,2}\s?[.:]\s?\d{2}(?:$|[^\d.:/-])",
        r"|\b(?:pukul|jam)\s*\d{1,2}\b",
        r"|\b\d{1,2}\s*(?:pagi|enjing|siang|siyang|awan|sore|sonten|petang|malam|malem|dalu|wengi|am|pm|wib|wita|wit)\b",
    ))
    .unwrap()
});

static PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(pagi|enjing|am|a\.m|siang|siyang|awan|sore|sonten|petang|malam|malem|dalu|wengi|pm|p\.m)\b",
    )
    .unwrap()
});

fn period_of(word: &str) -> Period {
    match word.to_lowercase().as_str() {
        "pagi" | "enjing" | "am" | "a.m" => Period::Morning,
        "siang" | "siyang" | "awan" => Period::Midday,
        "sore" | "sonten" | "petang" | "pm" | "p.m" => Period::Afternoon,
        _ => Period::Night,
    }
}

/// Find the period word belonging to a clock value ending at `after`:
/// the first one following it, else the last one before it.
fn find_period(text: &str, before: usize, after: usize) -> Option<Period> {
    if let Some(m) = PERIOD.find_at(text, after) {
        return Some(period_of(m.as_str()));
    }
    PERIOD
        .find_iter(&text[..before])
        .last()
        .map(|m| period_of(m.as_str()))
}

/// Apply the 12-hour qualifier to an hour.
pub fn to_24_hour(hour: u32, period: Option<Period>) -> u32 {
    match period {
        Some(Period::Afternoon) | Some(Period::Night) if hour < 12 => hour + 12,
        Some(Period::Midday) if (1..=5).contains(&hour) => hour + 12,
        Some(Period::Morning) if hour == 12 => 0,
        _ => hour,
    }
}

/// Whether free-form text carries a time of day at all.
pub fn has_clock(text: &str) -> bool {
    CLOCK_VALUE.is_match(text)
}

/// Canonical 24-hour `HH:MM` for a free-form time such as `7.30 malam`,
/// `Pukul 19.30 WIB` or `jam 8 enjing`. Anything without a clock value
/// yields `00:00`.
pub fn canonicalize_time(raw: &str) -> String {
    let Some(caps) = CLOCK.captures(raw) else {
        return "00:00".to_string();
    };
    let Some(hour_match) = caps.get(1) else {
        return "00:00".to_string();
    };
    let hour: u32 = hour_match.as_str().parse().unwrap_or(0);
    let minute_match = caps.get(2);
    let minute: u32 = minute_match
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    let end = minute_match.map(|m| m.end()).unwrap_or(hour_match.end());
    let period = find_period(raw, hour_match.start(), end);

    let hour = to_24_hour(hour, period).min(23);
    let minute = minute.min(59);
    format!("{:02}:{:02}", hour, minute)
}
