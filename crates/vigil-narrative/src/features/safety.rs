//! Safety cue detection.
//!
//! Four phrase groups are scanned over the whole narrative. A phrase found
//! at the same offset by more than one pattern is reported once.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use vigil_core::models::evaluation::{SafetyGroup, SafetyMatch};

use crate::text::NarrativeText;

const PROFESSIONAL_TARGET: &str = r"(?:qualified\s+)?(?:mental[- ]health\s+(?:professional|provider|clinician|service|team)s?|(?:child\s+)?(?:psychologist|psychiatrist|therapist|counsell?or)s?|gp|doctor|pa?ediatrician|clinician|health\s?care\s+provider)";

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("valid safety cue regex"))
        .collect()
}

static URGENT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\bcall\s+(?:911|999|112|000|emergency services)\b",
        r"\bemergency\s+(?:services|department|room)\b",
        r"\b(?:crisis|suicide)\s+(?:line|hotline|helpline|team|service)s?\b",
        r"\b(?:immediate(?:ly)?|urgent(?:ly)?)\s+(?:help|support|attention|care|assessment)\b",
        r"\bgo\s+to\s+(?:the\s+)?(?:nearest\s+)?(?:emergency|hospital|a&e)\b",
    ])
});

static HIGH_RISK: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\bself[- ]harm\w*",
        r"\bsuicid\w*",
        r"\bhurt(?:ing)?\s+(?:him|her|them)sel(?:f|ves)\b",
        r"\b(?:danger|harm)\s+to\s+(?:him|her|them)sel(?:f|ves)\b",
        r"\bsafety\s+plan\w*",
    ])
});

static PROFESSIONAL: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let verb_phrase = format!(
        r"\b(?:contact|consult|see|speak\s+(?:to|with)|talk\s+(?:to|with)|reach\s+out\s+to|refer(?:red|ral)?\s+to)\s+(?:(?:a|an|the|your|their)\s+)?{PROFESSIONAL_TARGET}\b"
    );
    let seek_phrase = format!(
        r"\bseek(?:ing)?\s+(?:professional\s+(?:help|support|advice)|(?:help|support|advice)\s+from\s+(?:(?:a|an|the|your|their)\s+)?{PROFESSIONAL_TARGET})\b"
    );
    compile(&[
        verb_phrase.as_str(),
        seek_phrase.as_str(),
        r"\bprofessional\s+(?:help|support|assessment|evaluation)\b",
    ])
});

static MONITOR: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\bmonitor(?:ing|ed)?\b",
        r"\bkeep\s+an\s+eye\s+on\b",
        r"\bwatch\s+for\b",
        r"\bcheck[- ]in\b",
        r"\bfollow[- ]up\b",
        r"\breassess\w*",
    ])
});

const GROUPS: [SafetyGroup; 4] = [
    SafetyGroup::Urgent,
    SafetyGroup::HighRisk,
    SafetyGroup::Professional,
    SafetyGroup::Monitor,
];

fn patterns(group: SafetyGroup) -> &'static [Regex] {
    match group {
        SafetyGroup::Urgent => &URGENT,
        SafetyGroup::HighRisk => &HIGH_RISK,
        SafetyGroup::Professional => &PROFESSIONAL,
        SafetyGroup::Monitor => &MONITOR,
    }
}

/// Every standard safety cue in the narrative, ordered by offset.
pub fn scan(text: &NarrativeText<'_>) -> Vec<SafetyMatch> {
    let groups = GROUPS.map(|group| (group, patterns(group)));
    scan_patterns(text, &groups)
}

/// Scan with an explicit pattern set. Empty matches are skipped; a phrase
/// at an offset already reported is dropped.
pub fn scan_patterns(text: &NarrativeText<'_>, groups: &[(SafetyGroup, &[Regex])]) -> Vec<SafetyMatch> {
    let mut seen: HashSet<(usize, String)> = HashSet::new();
    let mut matches = Vec::new();
    for (group, regexes) in groups {
        for re in *regexes {
            for m in re.find_iter(text.as_str()) {
                if m.is_empty() {
                    continue;
                }
                if !seen.insert((m.start(), m.as_str().to_lowercase())) {
                    continue;
                }
                matches.push(SafetyMatch {
                    group: *group,
                    phrase: m.as_str().to_string(),
                    offset: m.start(),
                    context: text.context(m.start(), m.end()),
                });
            }
        }
    }
    matches.sort_by_key(|m| (m.offset, m.group));
    matches
}

pub fn has_group(matches: &[SafetyMatch], group: SafetyGroup) -> bool {
    matches.iter().any(|m| m.group == group)
}
