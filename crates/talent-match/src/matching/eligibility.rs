use serde::{Deserialize, Serialize};

use super::domain::{CandidateProfile, JobVacancy};

/// Grace, in years, applied to both experience requirements.
const YEARS_GRACE: i64 = 1;

/// Hard requirement dimensions checked by the gate, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Title,
    YearsExperience,
    YearsInTitle,
    Salary,
    Skills,
    Qualification,
    Citizenship,
}

impl Criterion {
    pub const fn label(self) -> &'static str {
        match self {
            Criterion::Title => "title",
            Criterion::YearsExperience => "years_experience",
            Criterion::YearsInTitle => "years_in_title",
            Criterion::Salary => "salary",
            Criterion::Skills => "skills",
            Criterion::Qualification => "qualification",
            Criterion::Citizenship => "citizenship",
        }
    }
}

/// One unmet essential criterion with the message shown to the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedCriterion {
    pub criterion: Criterion,
    pub reason: String,
}

/// Result of the hard eligibility filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub is_valid: bool,
    pub failed_criteria: Vec<FailedCriterion>,
}

impl EligibilityOutcome {
    fn from_failures(failed_criteria: Vec<FailedCriterion>) -> Self {
        Self {
            is_valid: failed_criteria.is_empty(),
            failed_criteria,
        }
    }

    pub fn reasons(&self) -> Vec<String> {
        self.failed_criteria
            .iter()
            .map(|failure| failure.reason.clone())
            .collect()
    }

    pub fn failed(&self, criterion: Criterion) -> bool {
        self.failed_criteria
            .iter()
            .any(|failure| failure.criterion == criterion)
    }
}

/// Apply every essential check to the pair. Never fails; missing data fails the dimension.
///
/// Skill membership here is exact and case-sensitive, independent of the synonym taxonomy.
/// Years in title is checked whenever the job sets a minimum, with no essential flag.
pub fn validate_essential_criteria(job: &JobVacancy, profile: &CandidateProfile) -> EligibilityOutcome {
    let essential = job.essential;
    let mut failures = Vec::new();

    if essential.title {
        if let Some(reason) = check_title(job, profile) {
            failures.push(failed(Criterion::Title, reason));
        }
    }

    if essential.years_experience {
        if let Some(reason) = check_years(
            "years of experience",
            profile.years_experience,
            job.min_years_experience,
        ) {
            failures.push(failed(Criterion::YearsExperience, reason));
        }
    }

    if job.min_years_in_title > 0 {
        if let Some(reason) = check_years(
            "years in current title",
            profile.years_in_current_title,
            job.min_years_in_title,
        ) {
            failures.push(failed(Criterion::YearsInTitle, reason));
        }
    }

    if essential.salary {
        if let Some(reason) = check_salary(job, profile) {
            failures.push(failed(Criterion::Salary, reason));
        }
    }

    if essential.skills {
        if let Some(reason) = check_skills(job, profile) {
            failures.push(failed(Criterion::Skills, reason));
        }
    }

    if essential.qualification {
        if let Some(reason) = check_qualification(job, profile) {
            failures.push(failed(Criterion::Qualification, reason));
        }
    }

    if essential.citizenship {
        if let Some(reason) = check_citizenship(job, profile) {
            failures.push(failed(Criterion::Citizenship, reason));
        }
    }

    EligibilityOutcome::from_failures(failures)
}

fn failed(criterion: Criterion, reason: String) -> FailedCriterion {
    FailedCriterion { criterion, reason }
}

fn check_title(job: &JobVacancy, profile: &CandidateProfile) -> Option<String> {
    let wanted = job.title.trim().to_lowercase();
    if wanted.is_empty() {
        return Some("job title is not specified".to_string());
    }

    let matched = profile
        .job_titles
        .iter()
        .any(|title| title.trim().to_lowercase() == wanted);

    if matched {
        None
    } else {
        Some(format!(
            "job title '{}' does not match the candidate's titles",
            job.title.trim()
        ))
    }
}

fn check_years(what: &str, actual: Option<u32>, required: u32) -> Option<String> {
    let Some(actual) = actual else {
        return Some(format!("{what} not provided (requires {required})"));
    };

    if i64::from(actual) >= i64::from(required) - YEARS_GRACE {
        None
    } else {
        Some(format!("requires {required} {what}, candidate has {actual}"))
    }
}

fn check_salary(job: &JobVacancy, profile: &CandidateProfile) -> Option<String> {
    match (profile.salary, job.salary) {
        (Some(candidate), Some(offered))
            if candidate.is_well_formed() && offered.is_well_formed() =>
        {
            if candidate.overlaps(&offered) {
                None
            } else {
                Some(format!(
                    "salary expectation {:.0}-{:.0} does not overlap the offered {:.0}-{:.0}",
                    candidate.min, candidate.max, offered.min, offered.max
                ))
            }
        }
        _ => Some("salary range missing or invalid".to_string()),
    }
}

fn check_skills(job: &JobVacancy, profile: &CandidateProfile) -> Option<String> {
    let missing: Vec<&str> = job
        .required_skills
        .iter()
        .filter(|required| !profile.skills.contains(required))
        .map(String::as_str)
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(format!("missing required skills: {}", missing.join(", ")))
    }
}

fn check_qualification(job: &JobVacancy, profile: &CandidateProfile) -> Option<String> {
    let required: Vec<&str> = job
        .required_qualifications
        .iter()
        .map(|qualification| qualification.trim())
        .filter(|qualification| !qualification.is_empty())
        .collect();

    if required.is_empty() {
        return Some("job does not list the required qualifications".to_string());
    }

    let Some(text) = profile
        .additional_qualifications
        .as_deref()
        .filter(|text| !text.trim().is_empty())
    else {
        return Some(format!(
            "qualifications not provided (requires one of: {})",
            required.join(", ")
        ));
    };

    if required.iter().any(|qualification| text.contains(qualification)) {
        None
    } else {
        Some(format!(
            "none of the required qualifications found: {}",
            required.join(", ")
        ))
    }
}

fn check_citizenship(job: &JobVacancy, profile: &CandidateProfile) -> Option<String> {
    match (
        job.required_citizenship.as_deref(),
        profile.work_eligibility.as_deref(),
    ) {
        (Some(required), Some(actual)) if required == actual => None,
        (Some(required), Some(actual)) => Some(format!(
            "requires work eligibility '{required}', candidate has '{actual}'"
        )),
        (Some(required), None) => Some(format!(
            "requires work eligibility '{required}', candidate has not stated one"
        )),
        (None, _) => Some("job does not state the required work eligibility".to_string()),
    }
}
