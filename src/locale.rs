use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Language an invitation is written in. Selects the pattern tables,
/// calendar names and reply template for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Indonesian,
    /// Formal (krama) Javanese
    Javanese,
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::Indonesian => write!(f, "indonesian"),
            Locale::Javanese => write!(f, "javanese"),
        }
    }
}

static JAVANESE_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:dinten|wekdal(?:ipun)?|panggenan(?:ipun)?|tanggalipun|acaranipun|ngaturi|ngaturaken|rawuh|kagem|ingkang|wonten|sumangga|panjenengan|kawula|kula|mugi|dipun\w*|sedaya|saking)\b",
    )
    .unwrap()
});

static INDONESIAN_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:hari|tanggal|waktu|pukul|tempat|lokasi|mengundang|kehadiran|hadir|dilaksanakan|demikian|perhatian|kami|yang|dengan|pada|bertempat|agenda)\b",
    )
    .unwrap()
});

/// Outcome of locale classification, with the scores it was based on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub locale: Locale,
    pub javanese_score: usize,
    pub indonesian_score: usize,
}

/// Classify text by counting whole-word hits of each locale's marker words.
/// Javanese needs a strictly higher score; ties go to Indonesian.
pub fn classify(text: &str) -> Classification {
    let javanese_score = JAVANESE_MARKERS.find_iter(text).count();
    let indonesian_score = INDONESIAN_MARKERS.find_iter(text).count();
    let locale = if javanese_score > indonesian_score {
        Locale::Javanese
    } else {
        Locale::Indonesian
    };
    Classification {
        locale,
        javanese_score,
        indonesian_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_javanese_invitation() {
        let text = "Kawula ngaturi rawuh wonten ing acara Syawalan. Dinten : Senen, \
                    Wekdalipun : 19.30, Panggenanipun : Dalemipun Bapak Harjo";
        let result = classify(text);
        assert_eq!(result.locale, Locale::Javanese);
        assert!(result.javanese_score > result.indonesian_score);
    }

    #[test]
    fn test_classify_indonesian_invitation() {
        let text = "Dengan hormat, kami mengundang Bapak/Ibu pada rapat yang akan \
                    dilaksanakan pada Hari : Senin, Tempat : Balai Desa";
        assert_eq!(classify(text).locale, Locale::Indonesian);
    }

    #[test]
    fn test_classify_latin_only_text_without_markers_defaults_to_indonesian() {
        let result = classify("Meeting notes attached");
        assert_eq!(result.locale, Locale::Indonesian);
        assert_eq!(result.javanese_score, 0);
        assert_eq!(result.indonesian_score, 0);
    }

    #[test]
    fn test_classify_tie_goes_to_indonesian() {
        assert_eq!(classify("dinten hari").locale, Locale::Indonesian);
    }

    #[test]
    fn test_locale_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            locale: Locale,
        }
        let parsed: Wrapper = toml::from_str("locale = \"javanese\"").unwrap();
        assert_eq!(parsed.locale, Locale::Javanese);
    }
}
