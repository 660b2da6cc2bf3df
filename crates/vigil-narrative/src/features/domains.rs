use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use vigil_core::models::domain::ClinicalDomain;

use crate::text::NarrativeText;

static DEPRESSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(depress\w*|low mood|phq-?9?|ces-?dc|sadness)\b")
        .expect("valid depression regex")
});
static ANXIETY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(anxi\w*|worr(y|ies|ied|ying)|nervous\w*|panic\w*|gad-?7?|scared)\b")
        .expect("valid anxiety regex")
});
static WELLBEING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(well[- ]?being|who-?5|pedsql|quality of life|life satisfaction)\b")
        .expect("valid wellbeing regex")
});
static SELF_ESTEEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(self[- ]?esteem|self[- ]?worth|rses|rosenberg)\b")
        .expect("valid self-esteem regex")
});
static BEHAVIOUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(behaviou?r\w*|conduct|hyperactiv\w*|sdq|psc-?17|peer (problems|relationships))\b")
        .expect("valid behaviour regex")
});

fn pattern(domain: ClinicalDomain) -> &'static Regex {
    match domain {
        ClinicalDomain::Depression => &DEPRESSION_RE,
        ClinicalDomain::Anxiety => &ANXIETY_RE,
        ClinicalDomain::Wellbeing => &WELLBEING_RE,
        ClinicalDomain::SelfEsteem => &SELF_ESTEEM_RE,
        ClinicalDomain::Behaviour => &BEHAVIOUR_RE,
    }
}

pub fn mentions(text: &NarrativeText<'_>, domain: ClinicalDomain) -> bool {
    pattern(domain).is_match(text.as_str())
}

/// One flag per clinical domain, populated or not.
pub fn domain_mentions(text: &NarrativeText<'_>) -> BTreeMap<ClinicalDomain, bool> {
    ClinicalDomain::ALL
        .into_iter()
        .map(|domain| (domain, mentions(text, domain)))
        .collect()
}

/// Share of populated domains the narrative mentions; 0 when none are
/// populated.
pub fn coverage(mentioned: &BTreeMap<ClinicalDomain, bool>, populated: &[ClinicalDomain]) -> f64 {
    if populated.is_empty() {
        return 0.0;
    }
    let hits = populated
        .iter()
        .filter(|d| mentioned.get(d).copied().unwrap_or(false))
        .count();
    hits as f64 / populated.len() as f64
}
