use super::super::profile::ApplicantProfile;
use super::{CoachingRule, CoachingTopic};

pub(crate) const MIN_ANNUAL_INCOME: f64 = 300_000.0;
pub(crate) const MIN_EMPLOYED_YEARS: u32 = 2;
pub(crate) const MIN_AGE: u8 = 21;
pub(crate) const MIN_EDUCATION_CODE: u32 = 2;
pub(crate) const CO_APPLICANT_MARITAL_CODE: u32 = 1;

pub(crate) const INCOME_ADVICE: &str =
    "Increase your annual income or document additional income sources.";
pub(crate) const EMPLOYMENT_ADVICE: &str =
    "Maintain stable employment for another 6-12 months before reapplying.";
pub(crate) const AGE_ADVICE: &str =
    "Build a longer work history; lenders weigh a short track record at your age.";
pub(crate) const EDUCATION_ADVICE: &str =
    "Consider further education or a professional certification.";
pub(crate) const CO_APPLICANT_ADVICE: &str =
    "Add a co-applicant to strengthen your application.";
pub(crate) const STRONG_PROFILE: &str =
    "Your profile is already strong; only minor improvements are possible.";

fn low_income(profile: &ApplicantProfile) -> bool {
    profile.annual_income < MIN_ANNUAL_INCOME
}

fn short_employment(profile: &ApplicantProfile) -> bool {
    profile.employed_years < MIN_EMPLOYED_YEARS
}

fn young_applicant(profile: &ApplicantProfile) -> bool {
    profile.age < MIN_AGE
}

fn limited_education(profile: &ApplicantProfile) -> bool {
    profile.education < MIN_EDUCATION_CODE
}

fn co_applicant_candidate(profile: &ApplicantProfile) -> bool {
    profile.marital_status == CO_APPLICANT_MARITAL_CODE
}

/// Rule rows in evaluation (and display) order.
pub(crate) fn standard_rules() -> Vec<CoachingRule> {
    vec![
        CoachingRule::new(CoachingTopic::Income, low_income, INCOME_ADVICE),
        CoachingRule::new(CoachingTopic::Employment, short_employment, EMPLOYMENT_ADVICE),
        CoachingRule::new(CoachingTopic::Age, young_applicant, AGE_ADVICE),
        CoachingRule::new(CoachingTopic::Education, limited_education, EDUCATION_ADVICE),
        CoachingRule::new(
            CoachingTopic::CoApplicant,
            co_applicant_candidate,
            CO_APPLICANT_ADVICE,
        ),
    ]
}
