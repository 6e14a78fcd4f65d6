pub mod keywords;
pub mod rules;

use tracing::debug;

use crate::locale::Locale;
use rules::{Field, FieldRule, TERMINATOR};

/// A value captured by one rule of a chain
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    pub value: String,
    pub rule: &'static str,
}

/// Raw field values pulled out of an invitation, defaults already applied.
/// Date and time are still free-form here.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub meeting_type: String,
    pub day: Option<String>,
    pub date: String,
    pub time: String,
    pub location: String,
}

/// Characters left over from labels and chat formatting at value edges
const EDGE_PUNCTUATION: &[char] = &['*', ':', ';', ',', '.', '-', '"', '\'', '(', ')', '/'];

/// Cut a captured value at the first terminator after its start.
fn terminate(value: &str) -> &str {
    match TERMINATOR.find_iter(value).find(|m| m.start() > 0) {
        Some(m) => &value[..m.start()],
        None => value,
    }
}

/// Trim whitespace and residual punctuation from both ends and collapse
/// inner whitespace.
pub fn clean_value(value: &str) -> String {
    value
        .trim_matches(|c: char| c.is_whitespace() || EDGE_PUNCTUATION.contains(&c))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Try each rule in order; the first one that yields a non-empty value the
/// field accepts wins.
pub fn run_chain(text: &str, field: Field, chain: &[FieldRule]) -> Option<FieldMatch> {
    chain.iter().find_map(|rule| {
        let captured = rule.regex.captures(text)?.get(1)?.as_str();
        let value = clean_value(terminate(captured));
        if value.is_empty() || !rules::accepts(field, &value) {
            None
        } else {
            Some(FieldMatch {
                value,
                rule: rule.name,
            })
        }
    })
}

pub fn extract_field(text: &str, field: Field, locale: Locale) -> Option<FieldMatch> {
    let found = run_chain(text, field, rules::chain(field, locale));
    match &found {
        Some(m) => debug!(%field, rule = m.rule, value = %m.value, "Field matched"),
        None => debug!(%field, %locale, "No rule matched, using default"),
    }
    found
}

fn strip_invitation_prefix(value: String) -> String {
    const PREFIX: &str = "undangan ";
    match value.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => {
            let rest = clean_value(&value[PREFIX.len()..]);
            if rest.is_empty() {
                value
            } else {
                rest
            }
        }
        _ => value,
    }
}

/// Run every field chain over line-preserving text.
pub fn extract(text: &str, locale: Locale, default_location: &str) -> ExtractedFields {
    let or_default = |field: Field| -> String {
        extract_field(text, field, locale)
            .map(|m| m.value)
            .or_else(|| rules::default_value(field, locale).map(str::to_string))
            .unwrap_or_default()
    };

    let meeting_type = strip_invitation_prefix(or_default(Field::MeetingType));
    let day = extract_field(text, Field::Day, locale).map(|m| m.value);
    let date = or_default(Field::Date);
    let time = or_default(Field::Time);
    let location = extract_field(text, Field::Location, locale)
        .map(|m| m.value)
        .unwrap_or_else(|| default_location.to_string());

    ExtractedFields {
        meeting_type,
        day,
        date,
        time,
        location,
    }
}
