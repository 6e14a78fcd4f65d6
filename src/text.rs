//! OCR noise cleanup and whitespace normalization.

/// Characters OCR tends to hallucinate around text and chat clients use as
/// decoration. `*` is kept because it marks bold meeting names.
const NOISE_CHARS: &[char] = &[
    '|', '~', '^', '_', '=', '<', '>', '\\', '•', '·', '●', '■', '□', '►', '»', '«', '¦',
    '§', '¤', '©', '®', '™', '\u{200b}', '\u{feff}',
];

fn unify_char(c: char) -> Option<&'static str> {
    let unified = match c {
        '‘' | '’' | '`' | '´' => "'",
        '“' | '”' | '„' => "\"",
        '–' | '—' | '‒' | '−' => "-",
        '：' | '∶' | '꞉' => ":",
        '…' => "...",
        '\u{a0}' | '\t' => " ",
        _ => return None,
    };
    Some(unified)
}

fn clean_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if let Some(unified) = unify_char(c) {
            out.push_str(unified);
        } else if c == '\r' {
            out.push('\n');
        } else if NOISE_CHARS.contains(&c) || (c.is_control() && c != '\n') {
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}

/// Strip noise and collapse whitespace but keep one line per non-empty
/// source line, so label terminators at line ends still work.
pub fn clean_lines(text: &str) -> String {
    clean_chars(text)
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip noise, collapse every run of whitespace (newlines included) to a
/// single space and trim. Idempotent.
pub fn normalize(text: &str) -> String {
    clean_chars(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Both renderings of one piece of extracted text.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    /// Single-line form, used for keyword gating and locale detection
    pub flat: String,
    /// Line-preserving form, used for field extraction
    pub lines: String,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        Self {
            flat: normalize(raw),
            lines: clean_lines(raw),
        }
    }
}
