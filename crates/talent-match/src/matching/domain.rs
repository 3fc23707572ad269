use serde::{Deserialize, Deserializer, Serialize};

use super::eligibility::EligibilityOutcome;
use super::explanation::MatchLabel;

/// Identifier wrapper for candidates; the verification lookup is keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier wrapper for advertised vacancies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Opaque reference to an uploaded CV held by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef(pub String);

/// Closed salary interval. Ranges with `min > max` are treated as absent by scoring and gating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Closed-interval overlap test used by the salary gate.
    pub fn overlaps(&self, other: &SalaryRange) -> bool {
        self.min <= other.max && self.max >= other.min
    }
}

/// Candidate snapshot supplied fully materialized by the caller.
///
/// Carries no verification flag; that is resolved through the verification lookup at evaluation
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub candidate_id: CandidateId,
    #[serde(default, deserialize_with = "nullable_list")]
    pub job_titles: Vec<String>,
    #[serde(default)]
    pub years_experience: Option<u32>,
    #[serde(default)]
    pub years_in_current_title: Option<u32>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub locations: Vec<String>,
    #[serde(default)]
    pub salary: Option<SalaryRange>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub qualifications: Vec<String>,
    /// Free-text "additional skills/qualifications" entry from the profile form.
    #[serde(default)]
    pub additional_qualifications: Option<String>,
    #[serde(default)]
    pub work_eligibility: Option<String>,
    #[serde(default)]
    pub current_employer: Option<String>,
}

/// Per-dimension "essential" flags set by the employer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EssentialCriteria {
    pub title: bool,
    pub years_experience: bool,
    pub skills: bool,
    pub qualification: bool,
    pub salary: bool,
    pub citizenship: bool,
}

/// Vacancy snapshot supplied fully materialized by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobVacancy {
    pub job_id: JobId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_years_experience: u32,
    #[serde(default)]
    pub min_years_in_title: u32,
    #[serde(default)]
    pub salary: Option<SalaryRange>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub required_skills: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub required_qualifications: Vec<String>,
    #[serde(default)]
    pub required_citizenship: Option<String>,
    /// Minimum acceptable match percentage (0-100).
    #[serde(default)]
    pub match_threshold: f64,
    #[serde(default)]
    pub essential: EssentialCriteria,
}

/// The five weighted dimensions, each in [0,1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub title: f64,
    pub specialization: f64,
    pub location: f64,
    pub experience: f64,
    pub salary: f64,
}

/// Rounded 0-100 view of a breakdown, as persisted with a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPercentages {
    pub title: u8,
    pub specialization: u8,
    pub location: u8,
    pub experience: u8,
    pub salary: u8,
    pub total: u8,
}

impl MatchPercentages {
    pub fn from_scores(scores: &DimensionScores, total: f64) -> Self {
        Self {
            title: to_percentage(scores.title),
            specialization: to_percentage(scores.specialization),
            location: to_percentage(scores.location),
            experience: to_percentage(scores.experience),
            salary: to_percentage(scores.salary),
            total: to_percentage(total),
        }
    }
}

pub(crate) fn to_percentage(score: f64) -> u8 {
    if !score.is_finite() {
        return 0;
    }
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Immutable evaluation output for one `(profile, job)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub scores: DimensionScores,
    pub weighted_total: f64,
    pub verified: bool,
    /// `weighted_total`, or 0 when the candidate is not verified.
    pub gated_total: f64,
    /// Fuzzy skill score; reported alongside, never weighted into the total.
    pub skill_compatibility: f64,
    pub eligibility: EligibilityOutcome,
    pub label: MatchLabel,
    pub explanation: String,
}

impl MatchResult {
    /// Gated total as the 0-100 `match_percentage` stored with a submission.
    pub fn match_percentage(&self) -> u8 {
        to_percentage(self.gated_total)
    }

    pub fn percentages(&self) -> MatchPercentages {
        MatchPercentages::from_scores(&self.scores, self.gated_total)
    }
}

/// Treat an explicit `null` list the same as a missing one.
fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
