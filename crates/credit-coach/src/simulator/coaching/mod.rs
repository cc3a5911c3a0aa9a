//! Rule-based coaching tips for borderline or rejected applicants.
//!
//! Every rule is evaluated independently and in table order, so several tips can fire for the
//! same profile. When nothing fires the engine returns a single encouragement instead of an
//! empty list. Rendering the tips (markup, numbering) is left to the caller.

mod rules;

use super::profile::ApplicantProfile;
use serde::{Deserialize, Serialize};

pub(crate) use rules::STRONG_PROFILE;

/// Area of the profile a coaching rule addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingTopic {
    Income,
    Employment,
    Age,
    Education,
    CoApplicant,
}

impl CoachingTopic {
    pub fn label(&self) -> &'static str {
        match self {
            CoachingTopic::Income => "Income",
            CoachingTopic::Employment => "Employment",
            CoachingTopic::Age => "Age",
            CoachingTopic::Education => "Education",
            CoachingTopic::CoApplicant => "Co-applicant",
        }
    }
}

/// One row of the rule table: when `applies` holds, `advice` is appended.
#[derive(Clone, Copy)]
pub struct CoachingRule {
    pub topic: CoachingTopic,
    pub applies: fn(&ApplicantProfile) -> bool,
    pub advice: &'static str,
}

impl std::fmt::Debug for CoachingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoachingRule")
            .field("topic", &self.topic)
            .field("advice", &self.advice)
            .finish_non_exhaustive()
    }
}

impl CoachingRule {
    pub const fn new(
        topic: CoachingTopic,
        applies: fn(&ApplicantProfile) -> bool,
        advice: &'static str,
    ) -> Self {
        Self {
            topic,
            applies,
            advice,
        }
    }
}

/// Stateless evaluator over an ordered rule table.
#[derive(Debug, Clone)]
pub struct CoachingEngine {
    rules: Vec<CoachingRule>,
    fallback: &'static str,
}

impl Default for CoachingEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl CoachingEngine {
    /// Income, employment, age, education and co-applicant rules, in that order.
    pub fn standard() -> Self {
        Self::with_rules(rules::standard_rules(), STRONG_PROFILE)
    }

    pub fn with_rules(rules: Vec<CoachingRule>, fallback: &'static str) -> Self {
        Self { rules, fallback }
    }

    pub fn rules(&self) -> &[CoachingRule] {
        &self.rules
    }

    /// Rules whose condition holds for the profile, in table order.
    pub fn fired<'a>(
        &'a self,
        profile: &'a ApplicantProfile,
    ) -> impl Iterator<Item = &'a CoachingRule> + 'a {
        self.rules.iter().filter(move |rule| (rule.applies)(profile))
    }

    pub fn topics(&self, profile: &ApplicantProfile) -> Vec<CoachingTopic> {
        self.fired(profile).map(|rule| rule.topic).collect()
    }

    /// Ordered advice for the profile; never empty.
    pub fn generate(&self, profile: &ApplicantProfile) -> Vec<String> {
        let mut suggestions: Vec<String> = self
            .fired(profile)
            .map(|rule| rule.advice.to_string())
            .collect();

        if suggestions.is_empty() {
            suggestions.push(self.fallback.to_string());
        }

        suggestions
    }
}

/// Runs the standard rule table against a profile.
pub fn generate(profile: &ApplicantProfile) -> Vec<String> {
    CoachingEngine::standard().generate(profile)
}
