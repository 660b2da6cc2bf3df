use std::sync::LazyLock;

use regex::Regex;

use crate::text::NarrativeText;

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(recommend\w*|seek\w*|contact\w*|monitor\w*|encourag\w*|consider\w*|schedul\w*|follow[- ]up|consult\w*)\b",
    )
    .expect("valid action verb regex")
});

/// Occurrences of action vocabulary.
pub fn action_count(text: &NarrativeText<'_>) -> usize {
    ACTION_RE.find_iter(text.as_str()).count()
}
