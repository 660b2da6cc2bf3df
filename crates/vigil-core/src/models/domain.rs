use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A clinical construct populated by one or more instruments.
///
/// Declaration order is the default registration order, so maps keyed by
/// domain iterate depression first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ClinicalDomain {
    Depression,
    Anxiety,
    Wellbeing,
    SelfEsteem,
    Behaviour,
}

impl ClinicalDomain {
    pub const ALL: [ClinicalDomain; 5] = [
        ClinicalDomain::Depression,
        ClinicalDomain::Anxiety,
        ClinicalDomain::Wellbeing,
        ClinicalDomain::SelfEsteem,
        ClinicalDomain::Behaviour,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ClinicalDomain::Depression => "depression",
            ClinicalDomain::Anxiety => "anxiety",
            ClinicalDomain::Wellbeing => "wellbeing",
            ClinicalDomain::SelfEsteem => "self_esteem",
            ClinicalDomain::Behaviour => "behaviour",
        }
    }
}

impl std::fmt::Display for ClinicalDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Which way a score moves when the child is getting worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Direction {
    HigherWorse,
    LowerWorse,
    HigherBetter,
    /// Any direction string the registry does not recognise.
    #[serde(other)]
    Unrecognized,
}
