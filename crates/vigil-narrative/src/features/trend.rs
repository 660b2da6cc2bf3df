use std::sync::LazyLock;

use regex::Regex;

use crate::text::NarrativeText;

static TREND_TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(improv\w*|worsen\w*|stable|stabili[sz]\w*|unknown|declin\w*|deteriorat\w*)\b")
        .expect("valid trend term regex")
});
static CONFIDENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(limited data|insufficient (data|information|evidence)|not enough data|too few (assessments|data points|measurements)|(only|single) (one )?(assessment|timepoint|measurement|data point)s?|low confidence|(interpreted|treated) with caution|preliminary)\b",
    )
    .expect("valid confidence regex")
});

pub fn trend_term_count(text: &NarrativeText<'_>) -> usize {
    TREND_TERM_RE.find_iter(text.as_str()).count()
}

/// Whether the narrative admits that some trends rest on thin data.
pub fn acknowledges_confidence(text: &NarrativeText<'_>) -> bool {
    CONFIDENCE_RE.is_match(text.as_str())
}
