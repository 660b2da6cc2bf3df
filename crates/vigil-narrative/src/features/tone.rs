//! Empathy and structural clarity.

use std::sync::LazyLock;

use regex::Regex;

use crate::text::NarrativeText;

static EMPATHY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(understandabl[ey]|(it is|it's) (understandable|normal|natural|okay)|natural to feel|not alone|(challenging|difficult) (time|period)|we (understand|recogni[sz]e)|doing (their|his|her) best|acknowledg\w*)",
    )
    .expect("valid empathy regex")
});
static STRUCTURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[-*\x{2022}][ \t]+|\d+[.)][ \t]+|#{1,6}[ \t]+|\*\*[^*\n]+\*\*)")
        .expect("valid structure marker regex")
});

pub fn has_empathy(text: &NarrativeText<'_>) -> bool {
    EMPATHY_RE.is_match(text.as_str())
}

/// Bullets, numbered items, and heading-like lines.
pub fn structure_markers(text: &NarrativeText<'_>) -> usize {
    STRUCTURE_RE.find_iter(text.as_str()).count()
}
