use anyhow::{bail, Result};
use serde::Serialize;

use crate::calendar::{self, hijri};
use crate::extract::ExtractedFields;
use crate::locale::Locale;

/// Structured invitation, every field canonicalized and non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingDetails {
    pub meeting_type: String,
    pub day: Option<String>,
    pub date: String,
    /// Islamic calendar equivalent, present when the date parsed
    pub hijri_date: Option<String>,
    /// 24-hour `HH:MM`
    pub time: String,
    pub location: String,
}

impl MeetingDetails {
    /// Canonicalize raw extracted fields for the given locale.
    pub fn from_fields(fields: &ExtractedFields, locale: Locale) -> Self {
        let date = calendar::canonicalize_date(&fields.date);
        let day = calendar::resolve_day(fields.day.as_deref(), &fields.date, date.date, locale);
        let hijri_date = date
            .date
            .map(|d| hijri::from_gregorian(d).render(locale));

        Self {
            meeting_type: fields.meeting_type.clone(),
            day,
            date: date.text,
            hijri_date,
            time: calendar::canonicalize_time(&fields.time),
            location: fields.location.clone(),
        }
    }

    /// Check the record before it is rendered into a reply.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("meeting_type", &self.meeting_type),
            ("date", &self.date),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                bail!("Meeting field '{}' is empty", name);
            }
        }
        if !is_clock(&self.time) {
            bail!("Meeting time '{}' is not HH:MM", self.time);
        }
        Ok(())
    }

    /// Day line value, if there is anything worth showing.
    pub fn day_label(&self) -> Option<&str> {
        self.day.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }
}

fn is_clock(value: &str) -> bool {
    let Some((h, m)) = value.split_once(':') else {
        return false;
    };
    let in_range = |part: &str, max: u32| {
        part.len() == 2 && part.parse::<u32>().map(|v| v <= max).unwrap_or(false)
    };
    in_range(h, 23) && in_range(m, 59)
}
