use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, DocumentRef, JobId, MatchPercentages};
use super::explanation::MatchLabel;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Status tracked for an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Submitted,
    SubmittedWithWarning,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::SubmittedWithWarning => "submitted_with_warning",
        }
    }
}

/// Persisted submission, carrying the match outcome it was accepted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub application_id: ApplicationId,
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub cv_document: Option<DocumentRef>,
    pub match_percentage: u8,
    pub match_score_breakdown: MatchPercentages,
    pub match_explanation: String,
    pub match_label: MatchLabel,
    pub warning: Option<String>,
}

impl ApplicationRecord {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.application_id.clone(),
            job_id: self.job_id.clone(),
            status: self.status.label(),
            match_percentage: self.match_percentage,
            match_label: self.match_label.label(),
            match_explanation: self.match_explanation.clone(),
            warning: self.warning.clone(),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn for_job(&self, job_id: &JobId) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub status: &'static str,
    pub match_percentage: u8,
    pub match_label: &'static str,
    pub match_explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
