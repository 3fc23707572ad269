use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{CandidateProfile, DocumentRef, JobVacancy, MatchResult};
use super::repository::{
    ApplicationId, ApplicationRecord, ApplicationRepository, ApplicationStatus, RepositoryError,
};
use super::scoring::{decide_for, GatingDecision, MatchEngine};

/// A candidate's request to apply to a vacancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub candidate: CandidateProfile,
    pub job: JobVacancy,
    #[serde(default)]
    pub cv_document: Option<DocumentRef>,
}

/// Evaluation plus the gating decision the submission would receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPreview {
    pub result: MatchResult,
    pub decision: GatingDecision,
}

/// Service composing the match engine, gating policy, and repository.
pub struct ApplicationService<R> {
    repository: Arc<R>,
    engine: MatchEngine,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: MatchEngine) -> Self {
        Self { repository, engine }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// Evaluate without persisting anything.
    pub async fn preview(&self, submission: &ApplicationSubmission) -> MatchPreview {
        let result = self
            .engine
            .evaluate(
                &submission.candidate,
                &submission.job,
                submission.cv_document.as_ref(),
            )
            .await;
        let decision = decide_for(&result, submission.job.match_threshold);
        MatchPreview { result, decision }
    }

    /// Evaluate, enforce the gating policy, and persist the accepted submission.
    pub async fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let MatchPreview { result, decision } = self.preview(&submission).await;

        if !decision.allows_submission() {
            info!(
                candidate_id = %result.candidate_id.0,
                job_id = %result.job_id.0,
                match_percentage = result.match_percentage(),
                "application blocked by gating policy"
            );
            return Err(ApplicationServiceError::Blocked {
                decision,
                result: Box::new(result),
            });
        }

        let (status, warning) = if decision.has_warning() {
            (
                ApplicationStatus::SubmittedWithWarning,
                Some(decision.summary()),
            )
        } else {
            (ApplicationStatus::Submitted, None)
        };

        let record = ApplicationRecord {
            application_id: next_application_id(),
            candidate_id: result.candidate_id.clone(),
            job_id: result.job_id.clone(),
            status,
            submitted_at: Utc::now(),
            cv_document: submission.cv_document,
            match_percentage: result.match_percentage(),
            match_score_breakdown: result.percentages(),
            match_explanation: result.explanation.clone(),
            match_label: result.label,
            warning,
        };

        let stored = self.repository.insert(record)?;
        info!(
            application_id = %stored.application_id.0,
            job_id = %stored.job_id.0,
            status = stored.status.label(),
            "application submitted"
        );
        Ok(stored)
    }

    /// Fetch an application for API responses.
    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("{}", decision.summary())]
    Blocked {
        decision: GatingDecision,
        result: Box<MatchResult>,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
