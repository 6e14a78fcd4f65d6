//! Locale-specific reply templates and rendering.

use std::collections::HashMap;

use serde::Deserialize;

use crate::invitation::MeetingDetails;
use crate::locale::Locale;

/// Text fragments that make up a confirmation reply in one locale.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyTemplate {
    pub greeting: String,
    /// Followed by the meeting type
    pub thanks: String,
    /// Used by the fallback reply, where no meeting type is known
    pub thanks_generic: String,
    pub confirmation: String,
    pub default_location: String,
    pub sign_off: String,
}

/// Partial template from the config file; unset fragments keep the built-in text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateOverrides {
    pub greeting: Option<String>,
    pub thanks: Option<String>,
    pub thanks_generic: Option<String>,
    pub confirmation: Option<String>,
    pub default_location: Option<String>,
    pub sign_off: Option<String>,
}

struct FieldLabels {
    day: &'static str,
    date: &'static str,
    time: &'static str,
    location: &'static str,
}

const INDONESIAN_LABELS: FieldLabels = FieldLabels {
    day: "Hari",
    date: "Tanggal",
    time: "Waktu",
    location: "Tempat",
};

const JAVANESE_LABELS: FieldLabels = FieldLabels {
    day: "Dinten",
    date: "Tanggal",
    time: "Wekdal",
    location: "Panggenan",
};

impl ReplyTemplate {
    pub fn builtin(locale: Locale) -> Self {
        match locale {
            Locale::Indonesian => Self {
                greeting: "Wa'alaikumussalam Wr. Wb.".to_string(),
                thanks: "Terima kasih banyak atas undangannya untuk acara".to_string(),
                thanks_generic: "Terima kasih banyak atas undangannya.".to_string(),
                confirmation: "Insya Allah saya usahakan untuk hadir.".to_string(),
                default_location: "tempat yang akan ditentukan".to_string(),
                sign_off: "Wassalamu'alaikum Wr. Wb.".to_string(),
            },
            Locale::Javanese => Self {
                greeting: "Wa'alaikumussalam Wr. Wb.".to_string(),
                thanks: "Matur nuwun sanget kagem undanganipun dateng acara".to_string(),
                thanks_generic: "Matur nuwun sanget kagem undanganipun.".to_string(),
                confirmation: "Njeh, insyaAllah dalem usahaaken saget hadir.".to_string(),
                default_location: "panggenan ingkang badhe dipuntemtokaken".to_string(),
                sign_off: "Wassalamu'alaikum Wr. Wb.".to_string(),
            },
        }
    }

    fn apply(mut self, overrides: &TemplateOverrides) -> Self {
        let pick = |target: &mut String, value: &Option<String>| {
            if let Some(v) = value {
                *target = v.clone();
            }
        };
        pick(&mut self.greeting, &overrides.greeting);
        pick(&mut self.thanks, &overrides.thanks);
        pick(&mut self.thanks_generic, &overrides.thanks_generic);
        pick(&mut self.confirmation, &overrides.confirmation);
        pick(&mut self.default_location, &overrides.default_location);
        pick(&mut self.sign_off, &overrides.sign_off);
        self
    }
}

/// Immutable template table, built once at startup.
#[derive(Debug, Clone)]
pub struct ReplyTemplates {
    indonesian: ReplyTemplate,
    javanese: ReplyTemplate,
    default_locale: Locale,
}

impl Default for ReplyTemplates {
    fn default() -> Self {
        Self::new(Locale::default(), &HashMap::new())
    }
}

impl ReplyTemplates {
    pub fn new(default_locale: Locale, overrides: &HashMap<Locale, TemplateOverrides>) -> Self {
        let build = |locale: Locale| match overrides.get(&locale) {
            Some(o) => ReplyTemplate::builtin(locale).apply(o),
            None => ReplyTemplate::builtin(locale),
        };
        Self {
            indonesian: build(Locale::Indonesian),
            javanese: build(Locale::Javanese),
            default_locale,
        }
    }

    pub fn get(&self, locale: Locale) -> &ReplyTemplate {
        match locale {
            Locale::Indonesian => &self.indonesian,
            Locale::Javanese => &self.javanese,
        }
    }

    /// Render the confirmation reply. The day line is left out when the
    /// invitation did not give or imply a weekday.
    pub fn compose(&self, details: &MeetingDetails, locale: Locale) -> String {
        let template = self.get(locale);
        let labels = match locale {
            Locale::Indonesian => &INDONESIAN_LABELS,
            Locale::Javanese => &JAVANESE_LABELS,
        };

        let mut lines = vec![
            template.greeting.clone(),
            String::new(),
            format!("{} {}.", template.thanks, details.meeting_type),
        ];
        if let Some(day) = details.day_label() {
            lines.push(format!("{}: {}", labels.day, day));
        }
        let date = match &details.hijri_date {
            Some(hijri) => format!("{} ({})", details.date, hijri),
            None => details.date.clone(),
        };
        lines.push(format!("{}: {}", labels.date, date));
        lines.push(format!("{}: {}", labels.time, details.time));
        lines.push(format!("{}: {}", labels.location, details.location));
        lines.push(String::new());
        lines.push(template.confirmation.clone());
        lines.push(String::new());
        lines.push(template.sign_off.clone());
        lines.join("\n")
    }

    /// Short acknowledgement in the default locale, sent when the invitation
    /// could not be turned into a [`MeetingDetails`].
    pub fn compose_fallback(&self) -> String {
        let template = self.get(self.default_locale);
        [
            template.greeting.as_str(),
            "",
            template.thanks_generic.as_str(),
            template.confirmation.as_str(),
            "",
            template.sign_off.as_str(),
        ]
        .join("\n")
    }
}
