use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::super::domain::{CandidateId, DocumentRef};

/// Failure reported by an identity-verification backend.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("verification backend unavailable: {0}")]
    Unavailable(String),
    #[error("verification lookup rejected: {0}")]
    Rejected(String),
}

/// Independent identity verification, keyed by candidate id.
#[async_trait]
pub trait VerificationLookup: Send + Sync {
    async fn is_verified(&self, candidate_id: &CandidateId) -> Result<bool, VerificationError>;
}

/// Failure reported by the CV skill scorer.
#[derive(Debug, thiserror::Error)]
pub enum CvScoringError {
    #[error("cv document {0} not found")]
    DocumentNotFound(String),
    #[error("cv scoring unavailable: {0}")]
    Unavailable(String),
}

/// Scores how well an uploaded CV covers the required skills, in [0,1].
#[async_trait]
pub trait CvSkillScorer: Send + Sync {
    async fn score_cv_skills(
        &self,
        document: &DocumentRef,
        required_skills: &[String],
    ) -> Result<f64, CvScoringError>;
}

/// Wraps a lookup; errors and timeouts resolve to "not verified".
#[derive(Clone)]
pub struct VerificationGate {
    lookup: Arc<dyn VerificationLookup>,
    timeout: Duration,
}

impl VerificationGate {
    pub fn new(lookup: Arc<dyn VerificationLookup>, timeout: Duration) -> Self {
        Self { lookup, timeout }
    }

    pub async fn is_verified(&self, candidate_id: &CandidateId) -> bool {
        match tokio::time::timeout(self.timeout, self.lookup.is_verified(candidate_id)).await {
            Ok(Ok(verified)) => verified,
            Ok(Err(error)) => {
                warn!(candidate_id = %candidate_id.0, %error, "verification lookup failed; treating as unverified");
                false
            }
            Err(_) => {
                warn!(candidate_id = %candidate_id.0, timeout_ms = self.timeout.as_millis() as u64, "verification lookup timed out; treating as unverified");
                false
            }
        }
    }

    /// Forces the total to 0 unless the candidate is verified.
    pub fn gate(total: f64, verified: bool) -> f64 {
        if verified {
            total
        } else {
            0.0
        }
    }
}
