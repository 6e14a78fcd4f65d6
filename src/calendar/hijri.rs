//! Tabular Islamic calendar and the Javanese calendar built on it.
//!
//! The arithmetic calendar can differ by a day or two from the
//! sighting-based dates announced for religious observance.

use chrono::{Datelike, NaiveDate};

use crate::locale::Locale;

/// Offset between the Anno Javanico and Anno Hegirae year counts.
const JAVANESE_YEAR_OFFSET: i64 = 512;

/// Julian Day Number of 17 August 1945, a Jumat Legi.
const PASARAN_ANCHOR_JDN: i64 = 2_431_685;

const PASARAN: [&str; 5] = ["Legi", "Pahing", "Pon", "Wage", "Kliwon"];

const HIJRI_MONTHS: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabiul Awal",
    "Rabiul Akhir",
    "Jumadil Awal",
    "Jumadil Akhir",
    "Rajab",
    "Sya'ban",
    "Ramadhan",
    "Syawal",
    "Dzulqa'dah",
    "Dzulhijjah",
];

const JAVANESE_MONTHS: [&str; 12] = [
    "Sura",
    "Sapar",
    "Mulud",
    "Bakda Mulud",
    "Jumadilawal",
    "Jumadilakir",
    "Rejeb",
    "Ruwah",
    "Pasa",
    "Sawal",
    "Sela",
    "Besar",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HijriDate {
    pub day: u32,
    /// 1-based
    pub month: u32,
    pub year: i64,
}

/// Julian Day Number of a Gregorian date.
pub fn julian_day(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 + 1_721_425
}

pub fn from_gregorian(date: NaiveDate) -> HijriDate {
    let jd = julian_day(date);
    let mut l = jd - 1_948_440 + 10_632;
    let n = (l - 1) / 10_631;
    l = l - 10_631 * n + 354;
    let j = ((10_985 - l) / 5_316) * ((50 * l) / 17_719) + (l / 5_670) * ((43 * l) / 15_238);
    l = l - ((30 - j) / 15) * ((17_719 * j) / 50) - (j / 16) * ((15_238 * j) / 43) + 29;
    let month = (24 * l) / 709;
    let day = l - (709 * month) / 24;
    let year = 30 * n + j - 30;
    HijriDate {
        day: day as u32,
        month: month as u32,
        year,
    }
}

impl HijriDate {
    /// `20 Rajab 1446 H`, or `20 Rejeb 1958 J` in the Javanese reckoning.
    pub fn render(&self, locale: Locale) -> String {
        let idx = (self.month.clamp(1, 12) - 1) as usize;
        match locale {
            Locale::Indonesian => format!("{} {} {} H", self.day, HIJRI_MONTHS[idx], self.year),
            Locale::Javanese => format!(
                "{} {} {} J",
                self.day,
                JAVANESE_MONTHS[idx],
                self.year + JAVANESE_YEAR_OFFSET
            ),
        }
    }
}

/// Day of the five-day Javanese market week.
pub fn pasaran(date: NaiveDate) -> &'static str {
    let idx = (julian_day(date) - PASARAN_ANCHOR_JDN).rem_euclid(5);
    PASARAN[idx as usize]
}
