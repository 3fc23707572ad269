//! Candidate/job matching and eligibility engine.
//!
//! A `(CandidateProfile, JobVacancy)` pair flows through two independent paths: the essential
//! criteria gate in [`eligibility`] and the weighted five-dimension score in [`scoring`], which is
//! forced to zero for unverified candidates. [`explanation`] renders the breakdown and the
//! gating policy combines both paths for the submission workflow in [`service`].

pub mod domain;
pub mod eligibility;
pub mod explanation;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod taxonomy;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateId, CandidateProfile, DimensionScores, DocumentRef, EssentialCriteria, JobId,
    JobVacancy, MatchPercentages, MatchResult, SalaryRange,
};
pub use eligibility::{validate_essential_criteria, Criterion, EligibilityOutcome, FailedCriterion};
pub use explanation::{generate_explanation, match_label, MatchLabel};
pub use repository::{
    ApplicationId, ApplicationRecord, ApplicationRepository, ApplicationStatus,
    ApplicationStatusView, RepositoryError,
};
pub use router::application_router;
pub use scoring::{
    decide, decide_for, BatchCandidate, BlockReason, CvScoringError, CvSkillScorer,
    GatingDecision, MatchEngine, MatchWeights, VerificationError, VerificationGate,
    VerificationLookup, GRACE_BAND_POINTS, MATCH_WEIGHTS,
};
pub use service::{
    ApplicationService, ApplicationServiceError, ApplicationSubmission, MatchPreview,
};
pub use taxonomy::{blend_with_cv, SkillTaxonomy, SynonymGroup, TaxonomyError};
