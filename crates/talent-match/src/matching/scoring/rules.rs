use super::super::domain::{CandidateProfile, DimensionScores, JobVacancy, SalaryRange};

const EXACT: f64 = 1.0;
const CONTAINED: f64 = 0.8;
const NO_MATCH: f64 = 0.0;

/// Share of the salary score driven by range overlap; the rest rewards centred midpoints.
const SALARY_OVERLAP_WEIGHT: f64 = 0.7;
const SALARY_CENTER_WEIGHT: f64 = 0.3;

pub(crate) fn score_dimensions(profile: &CandidateProfile, job: &JobVacancy) -> DimensionScores {
    DimensionScores {
        title: title_match(&profile.job_titles, &job.title),
        specialization: specialization_match(&profile.job_titles, job.specialization.as_deref()),
        location: location_match(&profile.locations, job.location.as_deref()),
        experience: experience_match(profile.years_experience, job.min_years_experience),
        salary: salary_match(profile.salary, job.salary),
    }
}

/// Best match of any candidate title: equal 1.0, contained either way 0.8, otherwise 0.
pub fn title_match(candidate_titles: &[String], job_title: &str) -> f64 {
    let wanted = job_title.trim().to_lowercase();
    if wanted.is_empty() {
        return NO_MATCH;
    }

    let mut best = NO_MATCH;
    for title in candidate_titles {
        let title = title.trim().to_lowercase();
        if title.is_empty() {
            continue;
        }
        if title == wanted {
            return EXACT;
        }
        if title.contains(&wanted) || wanted.contains(&title) {
            best = CONTAINED;
        }
    }
    best
}

/// A title naming the specialization scores 1.0; a specialization naming a whole title 0.8.
pub fn specialization_match(candidate_titles: &[String], specialization: Option<&str>) -> f64 {
    let Some(wanted) = specialization
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
    else {
        return NO_MATCH;
    };

    let mut best = NO_MATCH;
    for title in candidate_titles {
        let title = title.trim().to_lowercase();
        if title.is_empty() {
            continue;
        }
        if title.contains(&wanted) {
            return EXACT;
        }
        if wanted.contains(&title) {
            best = CONTAINED;
        }
    }
    best
}

pub fn location_match(candidate_locations: &[String], job_location: Option<&str>) -> f64 {
    let Some(wanted) = job_location
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
    else {
        return NO_MATCH;
    };

    let matched = candidate_locations
        .iter()
        .any(|location| location.trim().to_lowercase() == wanted);

    if matched {
        EXACT
    } else {
        NO_MATCH
    }
}

/// Step function of `candidate - required` years with breakpoints at 0, -2 and -3.
pub fn experience_match(candidate_years: Option<u32>, min_years: u32) -> f64 {
    let Some(years) = candidate_years else {
        return NO_MATCH;
    };

    match i64::from(years) - i64::from(min_years) {
        diff if diff >= 0 => 1.0,
        diff if diff >= -2 => 0.8,
        diff if diff >= -3 => 0.5,
        _ => NO_MATCH,
    }
}

/// Blend of range overlap and midpoint proximity. Missing or inverted ranges score 0.
pub fn salary_match(candidate: Option<SalaryRange>, job: Option<SalaryRange>) -> f64 {
    let (Some(candidate), Some(job)) = (candidate, job) else {
        return NO_MATCH;
    };
    if !candidate.is_well_formed() || !job.is_well_formed() {
        return NO_MATCH;
    }

    let overlap = (candidate.max.min(job.max) - candidate.min.max(job.min)).max(0.0);
    let widest = candidate.span().max(job.span());
    let narrowest = candidate.span().min(job.span());
    let distance = (candidate.midpoint() - job.midpoint()).abs();

    let center_score = if widest > 0.0 {
        (1.0 - distance / widest).clamp(0.0, 1.0)
    } else if distance == 0.0 {
        1.0
    } else {
        0.0
    };

    let score = if overlap > 0.0 && narrowest > 0.0 {
        SALARY_OVERLAP_WEIGHT * (overlap / narrowest) + SALARY_CENTER_WEIGHT * center_score
    } else {
        SALARY_CENTER_WEIGHT * center_score
    };

    score.clamp(0.0, 1.0)
}
