//! Ordered pattern tables for each invitation field.
//!
//! Every rule is a regex whose first capture group starts the field value.
//! A chain is tried top to bottom and the first rule that leaves a
//! non-empty, acceptable value after termination and cleanup wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::calendar::time;
use crate::locale::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    MeetingType,
    Day,
    Date,
    Time,
    Location,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::MeetingType => write!(f, "meeting_type"),
            Field::Day => write!(f, "day"),
            Field::Date => write!(f, "date"),
            Field::Time => write!(f, "time"),
            Field::Location => write!(f, "location"),
        }
    }
}

pub struct FieldRule {
    pub name: &'static str,
    pub regex: &'static LazyLock<Regex>,
}

/// Where a captured value stops: the next labelled field, a time phrase
/// inside a date, or the closing formula of the letter. Newlines never
/// reach here because every rule captures `[^\n]`.
pub static TERMINATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:hari|dinten|tanggal(?:ipun)?|tgl|waktu|pukul|jam|wekdal(?:ipun)?|tempat|lokasi|",
        r"panggenan(?:ipun)?|papan|acara(?:nipun)?|agenda|perihal|kegiatan)\s*:",
        r"|\b(?:wekdalipun|panggenanipun|tanggalipun|acaranipun|bertempat)\b",
        r"|\b(?:mapan|manggen)\s+wonten\b",
        r"|\b(?:pukul|jam)\s*\d",
        r"|\b(?:demikian|atas\s+perhatian|mohon\s+kehadiran|wassalam\w*|matur\s+nuwun|hormat\s+kami|sumangga|katur)\b",
    ))
    .unwrap()
});

// ── Meeting type ────────────────────────────────────────────────────────

static RE_TYPE_BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:undangan|rapat|acara)\s*\*([^*\n]+)\*").unwrap());

static RE_TYPE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:acara|agenda|kegiatan)\s*: *([^\n]+)").unwrap());

/// Letter header, usually just `Hal : Undangan`
static RE_TYPE_PERIHAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:perihal|hal)\s*: *([^\n]+)").unwrap());

static RE_TYPE_ACARANIPUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bacaranipun\s*:? *([^\n]+)").unwrap());

static RE_TYPE_UNDANGAN_FREE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bundangan\s+((?:rapat|musyawarah|pertemuan|syukuran|pengajian|halal\s*bi\s*halal|arisan|sosialisasi|koordinasi)\b[^\n.,:]*)",
    )
    .unwrap()
});

static RE_TYPE_WONTEN_ING_ACARA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwonten\s+ing\s+acara\s+([^\n.,:]+)").unwrap());

static RE_TYPE_RAPAT_FREE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b((?:rapat|musyawarah)\s+[^\n.,:]{3,60})").unwrap()
});

// ── Day ─────────────────────────────────────────────────────────────────

static RE_DAY_HARI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bhari\s*: *([^\n]+)").unwrap());

static RE_DAY_DINTEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdinten\s*: *([^\n]+)").unwrap());

// ── Date ────────────────────────────────────────────────────────────────

static RE_DATE_HARI_TANGGAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bhari\s*(?:/|,|\s)\s*(?:tanggal|tgl)\.?\s*:? *([^\n]+)").unwrap()
});

static RE_DATE_DINTEN_TANGGAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdinten\s*(?:/|,|\s)\s*tanggal(?:ipun)?\s*:? *([^\n]+)").unwrap()
});

static RE_DATE_TANGGAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:tanggal|tgl)\.?\s*: *([^\n]+)").unwrap());

static RE_DATE_TANGGALIPUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btanggalipun\s*:? *([^\n]+)").unwrap());

static RE_DATE_DINTEN_FREE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdinten\s*:? *([^\n]+)").unwrap());

static RE_DATE_PADA_HARI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpada\s+hari\s+([^\n]+)").unwrap());

static RE_DATE_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2}\s+(?:jan|feb|peb|mar|apr|mei|may|jun|jul|agu|agt|aug|sep|okt|oct|nov|nop|des|dec)[a-z]*\.?\s+\d{4})\b",
    )
    .unwrap()
});

static RE_DATE_BARE_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}[-/.]\d{1,2}[-/.]\d{4})\b").unwrap());

// ── Time ────────────────────────────────────────────────────────────────

static RE_TIME_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:waktu|pukul|jam)\s*: *([^\n]+)").unwrap());

static RE_TIME_WEKDAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwekdal(?:ipun)?\s*:? *([^\n]+)").unwrap());

static RE_TIME_PUKUL_FREE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:pukul|jam)\s*(\d{1,2}(?:[.:]\d{2})?[^\n]*)").unwrap()
});

static RE_TIME_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}[.:]\d{2}\s*(?:WIB|WITA|WIT))\b").unwrap()
});

// ── Location ────────────────────────────────────────────────────────────

static RE_LOCATION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:tempat|lokasi)\s*: *([^\n]+)").unwrap());

static RE_LOCATION_PANGGENAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:panggenan(?:ipun)?\s*:?|papan\s*:) *([^\n]+)").unwrap()
});

static RE_LOCATION_BERTEMPAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bbertempat\s+(?:di\s+)?([^\n]+)").unwrap());

static RE_LOCATION_MAPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:mapan|manggen)\s+(?:wonten\s+ing|ing)\s+([^\n]+)").unwrap()
});

static TYPE_ID: &[FieldRule] = &[
    FieldRule { name: "bold", regex: &RE_TYPE_BOLD },
    FieldRule { name: "acara_label", regex: &RE_TYPE_LABEL },
    FieldRule { name: "perihal_label", regex: &RE_TYPE_PERIHAL },
    FieldRule { name: "undangan_free", regex: &RE_TYPE_UNDANGAN_FREE },
    FieldRule { name: "acaranipun_label", regex: &RE_TYPE_ACARANIPUN },
    FieldRule { name: "wonten_ing_acara", regex: &RE_TYPE_WONTEN_ING_ACARA },
    FieldRule { name: "rapat_free", regex: &RE_TYPE_RAPAT_FREE },
];

static TYPE_JV: &[FieldRule] = &[
    FieldRule { name: "bold", regex: &RE_TYPE_BOLD },
    FieldRule { name: "acaranipun_label", regex: &RE_TYPE_ACARANIPUN },
    FieldRule { name: "acara_label", regex: &RE_TYPE_LABEL },
    FieldRule { name: "wonten_ing_acara", regex: &RE_TYPE_WONTEN_ING_ACARA },
    FieldRule { name: "undangan_free", regex: &RE_TYPE_UNDANGAN_FREE },
    FieldRule { name: "perihal_label", regex: &RE_TYPE_PERIHAL },
    FieldRule { name: "rapat_free", regex: &RE_TYPE_RAPAT_FREE },
];

static DAY_ID: &[FieldRule] = &[
    FieldRule { name: "hari_label", regex: &RE_DAY_HARI },
    FieldRule { name: "dinten_label", regex: &RE_DAY_DINTEN },
];

static DAY_JV: &[FieldRule] = &[
    FieldRule { name: "dinten_label", regex: &RE_DAY_DINTEN },
    FieldRule { name: "hari_label", regex: &RE_DAY_HARI },
];

static DATE_ID: &[FieldRule] = &[
    FieldRule { name: "hari_tanggal", regex: &RE_DATE_HARI_TANGGAL },
    FieldRule { name: "tanggal_label", regex: &RE_DATE_TANGGAL },
    FieldRule { name: "hari_label", regex: &RE_DAY_HARI },
    FieldRule { name: "pada_hari", regex: &RE_DATE_PADA_HARI },
    FieldRule { name: "dinten_tanggal", regex: &RE_DATE_DINTEN_TANGGAL },
    FieldRule { name: "tanggalipun", regex: &RE_DATE_TANGGALIPUN },
    FieldRule { name: "dinten_free", regex: &RE_DATE_DINTEN_FREE },
    FieldRule { name: "bare_textual", regex: &RE_DATE_BARE },
    FieldRule { name: "bare_numeric", regex: &RE_DATE_BARE_NUMERIC },
];

static DATE_JV: &[FieldRule] = &[
    FieldRule { name: "dinten_tanggal", regex: &RE_DATE_DINTEN_TANGGAL },
    FieldRule { name: "tanggalipun", regex: &RE_DATE_TANGGALIPUN },
    FieldRule { name: "tanggal_label", regex: &RE_DATE_TANGGAL },
    FieldRule { name: "dinten_free", regex: &RE_DATE_DINTEN_FREE },
    FieldRule { name: "hari_tanggal", regex: &RE_DATE_HARI_TANGGAL },
    FieldRule { name: "hari_label", regex: &RE_DAY_HARI },
    FieldRule { name: "bare_textual", regex: &RE_DATE_BARE },
    FieldRule { name: "bare_numeric", regex: &RE_DATE_BARE_NUMERIC },
];

static TIME_ID: &[FieldRule] = &[
    FieldRule { name: "waktu_label", regex: &RE_TIME_LABEL },
    FieldRule { name: "pukul_free", regex: &RE_TIME_PUKUL_FREE },
    FieldRule { name: "wekdal_label", regex: &RE_TIME_WEKDAL },
    FieldRule { name: "bare_zone", regex: &RE_TIME_BARE },
];

static TIME_JV: &[FieldRule] = &[
    FieldRule { name: "wekdal_label", regex: &RE_TIME_WEKDAL },
    FieldRule { name: "waktu_label", regex: &RE_TIME_LABEL },
    FieldRule { name: "pukul_free", regex: &RE_TIME_PUKUL_FREE },
    FieldRule { name: "bare_zone", regex: &RE_TIME_BARE },
];

static LOCATION_ID: &[FieldRule] = &[
    FieldRule { name: "tempat_label", regex: &RE_LOCATION_LABEL },
    FieldRule { name: "bertempat", regex: &RE_LOCATION_BERTEMPAT },
    FieldRule { name: "panggenan_label", regex: &RE_LOCATION_PANGGENAN },
    FieldRule { name: "mapan_wonten", regex: &RE_LOCATION_MAPAN },
];

static LOCATION_JV: &[FieldRule] = &[
    FieldRule { name: "panggenan_label", regex: &RE_LOCATION_PANGGENAN },
    FieldRule { name: "mapan_wonten", regex: &RE_LOCATION_MAPAN },
    FieldRule { name: "tempat_label", regex: &RE_LOCATION_LABEL },
    FieldRule { name: "bertempat", regex: &RE_LOCATION_BERTEMPAT },
];

/// The ordered rule chain for one field in one locale.
pub fn chain(field: Field, locale: Locale) -> &'static [FieldRule] {
    match (field, locale) {
        (Field::MeetingType, Locale::Indonesian) => TYPE_ID,
        (Field::MeetingType, Locale::Javanese) => TYPE_JV,
        (Field::Day, Locale::Indonesian) => DAY_ID,
        (Field::Day, Locale::Javanese) => DAY_JV,
        (Field::Date, Locale::Indonesian) => DATE_ID,
        (Field::Date, Locale::Javanese) => DATE_JV,
        (Field::Time, Locale::Indonesian) => TIME_ID,
        (Field::Time, Locale::Javanese) => TIME_JV,
        (Field::Location, Locale::Indonesian) => LOCATION_ID,
        (Field::Location, Locale::Javanese) => LOCATION_JV,
    }
}

/// Whether a cleaned capture is usable for the field. A rejected capture
/// sends the chain on to its next rule.
pub fn accepts(field: Field, value: &str) -> bool {
    match field {
        Field::MeetingType => !value.eq_ignore_ascii_case("undangan"),
        Field::Time => time::has_clock(value),
        Field::Day | Field::Date | Field::Location => true,
    }
}

/// Value used when a whole chain misses. Location defaults come from the
/// locale's reply template instead.
pub fn default_value(field: Field, locale: Locale) -> Option<&'static str> {
    match (field, locale) {
        (Field::MeetingType, Locale::Indonesian) => Some("rapat penting"),
        (Field::MeetingType, Locale::Javanese) => Some("acara penting"),
        (Field::Date, Locale::Indonesian) => Some("hari yang akan ditentukan"),
        (Field::Date, Locale::Javanese) => Some("dinten ingkang badhe dipuntemtokaken"),
        (Field::Time, _) => Some("00:00"),
        (Field::Day, _) | (Field::Location, _) => None,
    }
}
