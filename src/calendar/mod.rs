//! Date and time canonicalization.
//!
//! Dates are parsed against an ordered list of layouts and rendered as
//! `17 Agustus 1945`. Text that matches no layout is returned cleaned but
//! otherwise unchanged.

pub mod hijri;
pub mod time;

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Weekday};
use regex::{Captures, Regex};

use crate::locale::Locale;

pub use time::canonicalize_time;

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Month number for an Indonesian, Javanese-spelled or English month name
/// or common abbreviation.
pub fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().trim_end_matches('.') {
        "januari" | "january" | "jan" => 1,
        "februari" | "pebruari" | "february" | "feb" | "peb" => 2,
        "maret" | "march" | "mar" => 3,
        "april" | "apr" => 4,
        "mei" | "may" => 5,
        "juni" | "june" | "jun" => 6,
        "juli" | "july" | "jul" => 7,
        "agustus" | "august" | "agu" | "agt" | "agus" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "oktober" | "october" | "okt" | "oct" => 10,
        "november" | "nopember" | "nov" | "nop" => 11,
        "desember" | "december" | "des" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize]
}

static WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(senin|senen|monday|selasa|slasa|tuesday|rabu|rebo|wednesday|kamis|kemis|thursday|jum'?at|jumuah|jemuwah|friday|sabtu|setu|saturday|minggu|ahad|sunday)\b",
    )
    .unwrap()
});

/// First weekday named anywhere in the text.
pub fn weekday_in(text: &str) -> Option<Weekday> {
    let word = WEEKDAY.find(text)?.as_str().to_lowercase();
    let weekday = match word.as_str() {
        "senin" | "senen" | "monday" => Weekday::Mon,
        "selasa" | "slasa" | "tuesday" => Weekday::Tue,
        "rabu" | "rebo" | "wednesday" => Weekday::Wed,
        "kamis" | "kemis" | "thursday" => Weekday::Thu,
        "sabtu" | "setu" | "saturday" => Weekday::Sat,
        "minggu" | "ahad" | "sunday" => Weekday::Sun,
        _ => Weekday::Fri,
    };
    Some(weekday)
}

pub fn weekday_name(weekday: Weekday, locale: Locale) -> &'static str {
    match (locale, weekday) {
        (Locale::Indonesian, Weekday::Mon) => "Senin",
        (Locale::Indonesian, Weekday::Tue) => "Selasa",
        (Locale::Indonesian, Weekday::Wed) => "Rabu",
        (Locale::Indonesian, Weekday::Thu) => "Kamis",
        (Locale::Indonesian, Weekday::Fri) => "Jumat",
        (Locale::Indonesian, Weekday::Sat) => "Sabtu",
        (Locale::Indonesian, Weekday::Sun) => "Minggu",
        (Locale::Javanese, Weekday::Mon) => "Senen",
        (Locale::Javanese, Weekday::Tue) => "Selasa",
        (Locale::Javanese, Weekday::Wed) => "Rebo",
        (Locale::Javanese, Weekday::Thu) => "Kemis",
        (Locale::Javanese, Weekday::Fri) => "Jemuwah",
        (Locale::Javanese, Weekday::Sat) => "Setu",
        (Locale::Javanese, Weekday::Sun) => "Ahad",
    }
}

struct DateLayout {
    name: &'static str,
    regex: &'static LazyLock<Regex>,
    build: fn(&Captures) -> Option<NaiveDate>,
}

static RE_ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());

static RE_DAY_MONTH_NAME_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:\s*-\s*|\s+)([a-z]{3,9})\.?(?:\s*-\s*|,?\s+)(\d{4}|\d{2})\b").unwrap()
});

static RE_MONTH_NAME_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})\b").unwrap()
});

static RE_NUMERIC_DMY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[-/. ](\d{1,2})[-/. ](\d{4}|\d{2})\b").unwrap());

static RE_COMPACT_DMY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2})(\d{2})(\d{4})\b").unwrap());

fn number(caps: &Captures, idx: usize) -> Option<u32> {
    caps.get(idx)?.as_str().parse().ok()
}

/// Years a parsed date may fall in. Hijri conversion is undefined before 622.
const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1900..=2200;

fn year(caps: &Captures, idx: usize) -> Option<i32> {
    let raw = caps.get(idx)?.as_str();
    let value: i32 = raw.parse().ok()?;
    let value = if raw.len() == 2 { 2000 + value } else { value };
    SUPPORTED_YEARS.contains(&value).then_some(value)
}

fn build_ymd(c: &Captures) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year(c, 1)?, number(c, 2)?, number(c, 3)?)
}

fn build_dmy(c: &Captures) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year(c, 3)?, number(c, 2)?, number(c, 1)?)
}

fn build_d_month_y(c: &Captures) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year(c, 3)?, month_from_name(c.get(2)?.as_str())?, number(c, 1)?)
}

fn build_month_d_y(c: &Captures) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year(c, 3)?, month_from_name(c.get(1)?.as_str())?, number(c, 2)?)
}

static DATE_LAYOUTS: &[DateLayout] = &[
    DateLayout {
        name: "iso",
        regex: &RE_ISO,
        build: build_ymd,
    },
    DateLayout {
        name: "day_month_name_year",
        regex: &RE_DAY_MONTH_NAME_YEAR,
        build: build_d_month_y,
    },
    DateLayout {
        name: "month_name_day_year",
        regex: &RE_MONTH_NAME_DAY_YEAR,
        build: build_month_d_y,
    },
    DateLayout {
        name: "numeric_dmy",
        regex: &RE_NUMERIC_DMY,
        build: build_dmy,
    },
    DateLayout {
        name: "compact_dmy",
        regex: &RE_COMPACT_DMY,
        build: build_dmy,
    },
];

/// First valid date under the first layout that yields one.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_LAYOUTS.iter().find_map(|layout| {
        let date = layout
            .regex
            .captures_iter(text)
            .find_map(|caps| (layout.build)(&caps))?;
        tracing::trace!(layout = layout.name, %date, "Date layout matched");
        Some(date)
    })
}

static SOLAR_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:m|masehi|ad)\b\.?\s*$|\b(?:jan|feb|peb|mar|apr|mei|may|jun|jul|agu|agt|aug|sep|okt|oct|nov|nop|des|dec)[a-z]*\b").unwrap()
});

/// Split `lunar / solar` dual-calendar text into its segments, solar-looking
/// ones first. Returns `None` for a plain date, including `17/08/1945`.
fn dual_segments(text: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = text.split('/').map(str::trim).collect();
    let is_calendar_phrase =
        |p: &&str| p.chars().any(|c| c.is_ascii_digit()) && p.chars().any(|c| c.is_alphabetic());
    if parts.len() != 2 || !parts.iter().all(is_calendar_phrase) {
        return None;
    }
    let (mut solar, lunar): (Vec<&str>, Vec<&str>) =
        parts.into_iter().partition(|p| SOLAR_MARKER.is_match(p));
    solar.extend(lunar);
    Some(solar)
}

fn clean_date_text(text: &str) -> String {
    crate::extract::clean_value(text)
}

/// A date in canonical form, with the parsed calendar date when one of the
/// layouts matched.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalDate {
    pub text: String,
    pub date: Option<NaiveDate>,
}

/// Canonicalize free-form date text. A `lunar / solar` pair resolves to
/// its Gregorian half; text no layout understands comes back cleaned.
pub fn canonicalize_date(raw: &str) -> CanonicalDate {
    let parsed = match dual_segments(raw) {
        Some(segments) => segments.into_iter().find_map(parse_date),
        None => parse_date(raw),
    };
    match parsed {
        Some(date) => CanonicalDate {
            text: format!("{} {} {}", date.day(), month_name(date.month()), date.year()),
            date: Some(date),
        },
        None => CanonicalDate {
            text: clean_date_text(raw),
            date: None,
        },
    }
}

/// The day line for a reply: a weekday named in the day or date text wins,
/// otherwise it is computed from the parsed date. The Javanese locale adds
/// the pasaran when the date is known.
pub fn resolve_day(
    day_raw: Option<&str>,
    date_raw: &str,
    date: Option<NaiveDate>,
    locale: Locale,
) -> Option<String> {
    let weekday = day_raw
        .and_then(weekday_in)
        .or_else(|| weekday_in(date_raw))
        .or_else(|| date.map(|d| d.weekday()));

    let Some(weekday) = weekday else {
        return day_raw.map(clean_date_text).filter(|d| !d.is_empty());
    };
    let name = weekday_name(weekday, locale);
    match (locale, date) {
        (Locale::Javanese, Some(date)) => Some(format!("{} {}", name, hijri::pasaran(date))),
        _ => Some(name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_textual_month_date() {
        let result = canonicalize_date("17 Agustus 1945");
        assert_eq!(result.date, Some(ymd(1945, 8, 17)));
        assert_eq!(result.text, "17 Agustus 1945");
    }

    #[test]
    fn test_date_with_weekday_prefix_and_abbreviation() {
        assert_eq!(
            canonicalize_date("Senin, 20 Jan 2025").text,
            "20 Januari 2025"
        );
        assert_eq!(canonicalize_date("Kamis 7-Nop-2024").text, "7 November 2024");
        assert_eq!(canonicalize_date("August 17, 1945").text, "17 Agustus 1945");
    }

    #[test]
    fn test_numeric_layouts() {
        assert_eq!(canonicalize_date("17-08-1945").date, Some(ymd(1945, 8, 17)));
        assert_eq!(canonicalize_date("Senin, 17/08/1945").date, Some(ymd(1945, 8, 17)));
        assert_eq!(canonicalize_date("20.01.25").date, Some(ymd(2025, 1, 20)));
        assert_eq!(canonicalize_date("20012025").date, Some(ymd(2025, 1, 20)));
        assert_eq!(canonicalize_date("2025-01-20").date, Some(ymd(2025, 1, 20)));
    }

    #[test]
    fn test_dual_calendar_prefers_solar_half() {
        let result = canonicalize_date("20 Rajab 1446 H / 20 Januari 2025 M");
        assert_eq!(result.text, "20 Januari 2025");

        let result = canonicalize_date("20 Januari 2025 / 20 Rejeb 1958");
        assert_eq!(result.date, Some(ymd(2025, 1, 20)));
    }

    #[test]
    fn test_invalid_calendar_values_are_skipped() {
        // 31 Februari is not a date; the later valid one is used.
        let result = canonicalize_date("31 Februari 2025 atau 3 Maret 2025");
        assert_eq!(result.date, Some(ymd(2025, 3, 3)));
    }

    #[test]
    fn test_years_outside_supported_range_are_not_parsed() {
        let result = canonicalize_date("17 Agustus 0001");
        assert_eq!(result.date, None);
        assert_eq!(result.text, "17 Agustus 0001");
        assert_eq!(canonicalize_date("01-01-9999").date, None);
        assert_eq!(canonicalize_date("01-01-2200").date, Some(ymd(2200, 1, 1)));
    }

    #[test]
    fn test_unparseable_text_is_returned_cleaned() {
        let result = canonicalize_date("  hari yang akan ditentukan. ");
        assert_eq!(result.date, None);
        assert_eq!(result.text, "hari yang akan ditentukan");

        let result = canonicalize_date("5 Rejeb 1958");
        assert_eq!(result.date, None);
        assert_eq!(result.text, "5 Rejeb 1958");
    }

    #[test]
    fn test_resolve_day_prefers_stated_weekday() {
        let date = Some(ymd(2025, 1, 20));
        assert_eq!(
            resolve_day(Some("Senin"), "20 Januari 2025", date, Locale::Indonesian).as_deref(),
            Some("Senin")
        );
        assert_eq!(
            resolve_day(None, "Senin, 20 Januari 2025", date, Locale::Javanese).as_deref(),
            Some("Senen Pahing")
        );
    }

    #[test]
    fn test_resolve_day_computes_weekday_from_date() {
        assert_eq!(
            resolve_day(None, "17 Agustus 1945", Some(ymd(1945, 8, 17)), Locale::Indonesian)
                .as_deref(),
            Some("Jumat")
        );
        assert_eq!(
            resolve_day(None, "17 Agustus 1945", Some(ymd(1945, 8, 17)), Locale::Javanese)
                .as_deref(),
            Some("Jemuwah Legi")
        );
    }

    #[test]
    fn test_resolve_day_without_any_information() {
        assert_eq!(
            resolve_day(None, "hari yang akan ditentukan", None, Locale::Indonesian),
            None
        );
        assert_eq!(
            resolve_day(Some("Besok"), "-", None, Locale::Indonesian).as_deref(),
            Some("Besok")
        );
    }
}
