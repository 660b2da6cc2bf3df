use std::sync::LazyLock;

use regex::Regex;

use vigil_core::models::evaluation::Section;

use crate::text::NarrativeText;

/// A line that opens with the heading words, optionally behind markdown
/// heading marks, bold, or a list number.
fn heading(words: &str) -> Regex {
    let pattern = format!(r"(?im)^[ \t]*(?:#{{1,6}}[ \t]*|\*\*|__|\d+[.)][ \t]*)?(?:{words})\b");
    Regex::new(&pattern).expect("valid section heading regex")
}

static SECTION_PATTERNS: LazyLock<Vec<(Section, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Section::CurrentPicture,
            heading(r"current (picture|presentation|status|situation)|overview|summary"),
        ),
        (
            Section::Trends,
            heading(r"trends?|changes over time|progress over time"),
        ),
        (
            Section::FlagsAndRisks,
            heading(r"(clinical )?flags?|risks?|areas of concern|concerns|safety"),
        ),
        (Section::Strengths, heading(r"strengths?|protective factors|positives")),
        (
            Section::Recommendations,
            heading(r"recommendations?|next steps|suggested actions"),
        ),
    ]
});

pub fn has_section(text: &NarrativeText<'_>, section: Section) -> bool {
    SECTION_PATTERNS
        .iter()
        .find(|(s, _)| *s == section)
        .is_some_and(|(_, re)| re.is_match(text.as_str()))
}

/// Sections present, in canonical order.
pub fn sections_found(text: &NarrativeText<'_>) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|section| has_section(text, *section))
        .collect()
}
