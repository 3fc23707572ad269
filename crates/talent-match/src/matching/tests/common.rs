use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::config::MatchingConfig;
use crate::matching::domain::{
    CandidateId, CandidateProfile, DocumentRef, EssentialCriteria, JobId, JobVacancy, SalaryRange,
};
use crate::matching::repository::{
    ApplicationId, ApplicationRecord, ApplicationRepository, RepositoryError,
};
use crate::matching::scoring::{
    CvScoringError, CvSkillScorer, MatchEngine, VerificationError, VerificationLookup,
};
use crate::matching::service::{ApplicationService, ApplicationSubmission};

pub(super) const VERIFIED_ID: &str = "cand-verified";

pub(super) fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn candidate() -> CandidateProfile {
    CandidateProfile {
        candidate_id: CandidateId(VERIFIED_ID.to_string()),
        job_titles: strings(&["Senior Frontend Developer"]),
        years_experience: Some(6),
        years_in_current_title: Some(3),
        locations: strings(&["London", "Remote"]),
        salary: Some(SalaryRange::new(60_000.0, 80_000.0)),
        skills: strings(&["React", "TypeScript", "CSS"]),
        qualifications: strings(&["BSc Computer Science"]),
        additional_qualifications: Some(
            "BSc Computer Science, AWS Certified Developer".to_string(),
        ),
        work_eligibility: Some("UK Citizen".to_string()),
        current_employer: Some("Northwind".to_string()),
    }
}

pub(super) fn candidate_with_id(id: &str) -> CandidateProfile {
    let mut profile = candidate();
    profile.candidate_id = CandidateId(id.to_string());
    profile
}

pub(super) fn job() -> JobVacancy {
    JobVacancy {
        job_id: JobId("job-frontend".to_string()),
        title: "Senior Frontend Developer".to_string(),
        specialization: Some("Frontend".to_string()),
        location: Some("London".to_string()),
        min_years_experience: 5,
        min_years_in_title: 0,
        salary: Some(SalaryRange::new(65_000.0, 85_000.0)),
        required_skills: strings(&["React", "TypeScript"]),
        required_qualifications: strings(&["BSc"]),
        required_citizenship: Some("UK Citizen".to_string()),
        match_threshold: 70.0,
        essential: EssentialCriteria::default(),
    }
}

pub(super) fn all_essential() -> EssentialCriteria {
    EssentialCriteria {
        title: true,
        years_experience: true,
        skills: true,
        qualification: true,
        salary: true,
        citizenship: true,
    }
}

pub(super) fn submission() -> ApplicationSubmission {
    ApplicationSubmission {
        candidate: candidate(),
        job: job(),
        cv_document: None,
    }
}

/// Verifies a fixed set of ids and reports an outage for ids starting with `broken`.
pub(super) struct StaticVerifier {
    verified: HashSet<String>,
}

impl StaticVerifier {
    pub(super) fn verifying(ids: &[&str]) -> Self {
        Self {
            verified: ids.iter().map(|id| id.to_string()).collect(),
        }
    }
}

#[async_trait]
impl VerificationLookup for StaticVerifier {
    async fn is_verified(&self, candidate_id: &CandidateId) -> Result<bool, VerificationError> {
        if candidate_id.0.starts_with("broken") {
            return Err(VerificationError::Unavailable("identity provider down".to_string()));
        }
        Ok(self.verified.contains(&candidate_id.0))
    }
}

pub(super) struct SlowVerifier;

#[async_trait]
impl VerificationLookup for SlowVerifier {
    async fn is_verified(&self, _candidate_id: &CandidateId) -> Result<bool, VerificationError> {
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(true)
    }
}

pub(super) struct FixedCvScorer(pub(super) f64);

#[async_trait]
impl CvSkillScorer for FixedCvScorer {
    async fn score_cv_skills(
        &self,
        _document: &DocumentRef,
        _required_skills: &[String],
    ) -> Result<f64, CvScoringError> {
        Ok(self.0)
    }
}

pub(super) struct MissingCvScorer;

#[async_trait]
impl CvSkillScorer for MissingCvScorer {
    async fn score_cv_skills(
        &self,
        document: &DocumentRef,
        _required_skills: &[String],
    ) -> Result<f64, CvScoringError> {
        Err(CvScoringError::DocumentNotFound(document.0.clone()))
    }
}

pub(super) fn matching_config() -> MatchingConfig {
    MatchingConfig {
        verification_timeout: Duration::from_millis(50),
        ..MatchingConfig::default()
    }
}

pub(super) fn engine() -> MatchEngine {
    MatchEngine::new(
        Arc::new(StaticVerifier::verifying(&[VERIFIED_ID])),
        &matching_config(),
    )
}

pub(super) fn engine_with(lookup: Arc<dyn VerificationLookup>) -> MatchEngine {
    MatchEngine::new(lookup, &matching_config())
}

pub(super) fn assert_unit_interval(value: f64) {
    assert!(
        (0.0..=1.0).contains(&value),
        "expected value in [0,1], got {value}"
    );
}

pub(super) fn build_service() -> (ApplicationService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ApplicationService::new(repository.clone(), engine());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_job(&self, job_id: &JobId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.job_id == job_id)
            .cloned()
            .collect())
    }
}

pub(super) struct ConflictRepository;

impl ApplicationRepository for ConflictRepository {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(None)
    }

    fn for_job(&self, _job_id: &JobId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_job(&self, _job_id: &JobId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
