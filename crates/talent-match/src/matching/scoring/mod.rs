mod config;
mod policy;
mod rules;
mod verification;

pub use config::{MatchWeights, MATCH_WEIGHTS};
pub use policy::{decide, decide_for, BlockReason, GatingDecision, GRACE_BAND_POINTS};
pub use rules::{experience_match, location_match, salary_match, specialization_match, title_match};
pub use verification::{
    CvScoringError, CvSkillScorer, VerificationError, VerificationGate, VerificationLookup,
};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use super::domain::{
    CandidateProfile, DimensionScores, DocumentRef, JobVacancy, MatchPercentages, MatchResult,
};
use super::eligibility::validate_essential_criteria;
use super::explanation::{generate_explanation, match_label};
use super::taxonomy::{blend_with_cv, SkillTaxonomy};
use crate::config::MatchingConfig;

/// One candidate in a batch evaluation, with its optional CV upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCandidate {
    pub profile: CandidateProfile,
    #[serde(default)]
    pub cv_document: Option<DocumentRef>,
}

/// Evaluates candidate/job pairs against injected verification and CV collaborators.
#[derive(Clone)]
pub struct MatchEngine {
    taxonomy: Arc<SkillTaxonomy>,
    verification: VerificationGate,
    cv_scorer: Option<Arc<dyn CvSkillScorer>>,
}

impl MatchEngine {
    pub fn new(lookup: Arc<dyn VerificationLookup>, config: &MatchingConfig) -> Self {
        Self {
            taxonomy: Arc::new(SkillTaxonomy::builtin()),
            verification: VerificationGate::new(lookup, config.verification_timeout),
            cv_scorer: None,
        }
    }

    pub fn with_taxonomy(mut self, taxonomy: Arc<SkillTaxonomy>) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    pub fn with_cv_scorer(mut self, scorer: Arc<dyn CvSkillScorer>) -> Self {
        self.cv_scorer = Some(scorer);
        self
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    /// The five dimension scores; pure.
    pub fn breakdown(&self, profile: &CandidateProfile, job: &JobVacancy) -> DimensionScores {
        rules::score_dimensions(profile, job)
    }

    /// Fuzzy skill score, blended 50/50 with the CV scorer when a document is supplied.
    pub async fn skills_match_score(
        &self,
        candidate_skills: &[String],
        required_skills: &[String],
        cv_document: Option<&DocumentRef>,
    ) -> f64 {
        if candidate_skills.is_empty() || required_skills.is_empty() {
            return 0.0;
        }

        let profile_score = self
            .taxonomy
            .skills_match_score(candidate_skills, required_skills);

        let (Some(document), Some(scorer)) = (cv_document, self.cv_scorer.as_ref()) else {
            return profile_score;
        };

        match scorer.score_cv_skills(document, required_skills).await {
            Ok(cv_score) if cv_score.is_finite() => {
                blend_with_cv(profile_score, cv_score.clamp(0.0, 1.0))
            }
            Ok(cv_score) => {
                warn!(document = %document.0, cv_score, "cv scorer returned a non-finite score; using profile skills only");
                profile_score
            }
            Err(error) => {
                warn!(document = %document.0, %error, "cv scoring failed; using profile skills only");
                profile_score
            }
        }
    }

    /// Full evaluation of one pair, including the verification lookup.
    pub async fn evaluate(
        &self,
        profile: &CandidateProfile,
        job: &JobVacancy,
        cv_document: Option<&DocumentRef>,
    ) -> MatchResult {
        let skill_compatibility = self
            .skills_match_score(&profile.skills, &job.required_skills, cv_document)
            .await;
        let verified = self.verification.is_verified(&profile.candidate_id).await;

        self.assemble(profile, job, skill_compatibility, verified)
    }

    /// Evaluate one job against many candidates concurrently. Results keep the input order and
    /// a failed task degrades to an unverified result instead of aborting the batch.
    pub async fn evaluate_batch(
        &self,
        job: &JobVacancy,
        candidates: Vec<BatchCandidate>,
    ) -> Vec<MatchResult> {
        let shared_job = Arc::new(job.clone());
        let mut tasks = JoinSet::new();

        for (index, candidate) in candidates.iter().cloned().enumerate() {
            let engine = self.clone();
            let job = Arc::clone(&shared_job);
            tasks.spawn(async move {
                let result = engine
                    .evaluate(&candidate.profile, &job, candidate.cv_document.as_ref())
                    .await;
                (index, result)
            });
        }

        let mut results: Vec<Option<MatchResult>> = vec![None; candidates.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(join_error) => error!(%join_error, "batch evaluation task failed"),
            }
        }

        results
            .into_iter()
            .zip(candidates)
            .map(|(result, candidate)| {
                result.unwrap_or_else(|| {
                    let skills = self
                        .taxonomy
                        .skills_match_score(&candidate.profile.skills, &job.required_skills);
                    self.assemble(&candidate.profile, job, skills, false)
                })
            })
            .collect()
    }

    fn assemble(
        &self,
        profile: &CandidateProfile,
        job: &JobVacancy,
        skill_compatibility: f64,
        verified: bool,
    ) -> MatchResult {
        let scores = self.breakdown(profile, job);
        let weighted_total = MATCH_WEIGHTS.total(&scores);
        let gated_total = VerificationGate::gate(weighted_total, verified);
        let eligibility = validate_essential_criteria(job, profile);
        let percentages = MatchPercentages::from_scores(&scores, gated_total);

        debug!(
            candidate_id = %profile.candidate_id.0,
            job_id = %job.job_id.0,
            weighted_total,
            gated_total,
            verified,
            eligible = eligibility.is_valid,
            "evaluated candidate against vacancy"
        );

        MatchResult {
            candidate_id: profile.candidate_id.clone(),
            job_id: job.job_id.clone(),
            scores,
            weighted_total,
            verified,
            gated_total,
            skill_compatibility,
            eligibility,
            label: match_label(percentages.total),
            explanation: generate_explanation(&percentages),
        }
    }
}
