use std::sync::LazyLock;

use regex::Regex;

/// Markers of a formal invitation in either supported locale: a bold
/// meeting name or a field label. "undangan" alone does not count.
static INVITATION_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)undangan\s*\*.*\*|rapat\s*\*.*\*|\bngaturi\s+rawuh\b|\bwekdalipun\b|\bpanggenanipun\b|\bdilaksanakan\b|\bdinten\b|\bhari\s*(?:/\s*tanggal\s*)?:",
    )
    .unwrap()
});

/// Whether normalized text looks like a meeting invitation.
pub fn is_invitation(text: &str) -> bool {
    INVITATION_KEYWORDS.is_match(text)
}
