use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talent_match::config::MatchingConfig;
use talent_match::error::AppError;
use talent_match::matching::{
    ApplicationId, ApplicationRecord, ApplicationRepository, CandidateId, CvScoringError,
    CvSkillScorer, DocumentRef, JobId, MatchEngine, RepositoryError, SkillTaxonomy,
    VerificationError, VerificationLookup,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        if guard.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn for_job(&self, job_id: &JobId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        let mut records: Vec<ApplicationRecord> = guard
            .values()
            .filter(|record| &record.job_id == job_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(records)
    }
}

/// Verification backed by a fixed list of candidate ids, loaded from configuration.
#[derive(Debug, Default, Clone)]
pub(crate) struct StaticVerificationDirectory {
    verified: HashSet<String>,
}

impl StaticVerificationDirectory {
    pub(crate) fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            verified: ids.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl VerificationLookup for StaticVerificationDirectory {
    async fn is_verified(&self, candidate_id: &CandidateId) -> Result<bool, VerificationError> {
        Ok(self.verified.contains(&candidate_id.0))
    }
}

/// CV store holding the skills extracted from each uploaded document.
#[derive(Debug, Clone)]
pub(crate) struct InMemoryCvIndex {
    taxonomy: Arc<SkillTaxonomy>,
    documents: HashMap<String, Vec<String>>,
}

impl InMemoryCvIndex {
    pub(crate) fn new(taxonomy: Arc<SkillTaxonomy>) -> Self {
        Self {
            taxonomy,
            documents: HashMap::new(),
        }
    }

    pub(crate) fn with_document(mut self, document: &DocumentRef, skills: Vec<String>) -> Self {
        self.documents.insert(document.0.clone(), skills);
        self
    }
}

#[async_trait]
impl CvSkillScorer for InMemoryCvIndex {
    async fn score_cv_skills(
        &self,
        document: &DocumentRef,
        required_skills: &[String],
    ) -> Result<f64, CvScoringError> {
        let skills = self
            .documents
            .get(&document.0)
            .ok_or_else(|| CvScoringError::DocumentNotFound(document.0.clone()))?;
        Ok(self.taxonomy.skills_match_score(skills, required_skills))
    }
}

pub(crate) fn load_taxonomy(config: &MatchingConfig) -> Result<Arc<SkillTaxonomy>, AppError> {
    let taxonomy = match &config.skill_taxonomy_path {
        Some(path) => {
            let taxonomy = SkillTaxonomy::from_path(path)?;
            info!(
                path = %path.display(),
                groups = taxonomy.groups().len(),
                "loaded skill taxonomy extensions"
            );
            taxonomy
        }
        None => SkillTaxonomy::builtin(),
    };
    Ok(Arc::new(taxonomy))
}

/// Engine wired with the configured verification list and taxonomy, plus an empty CV index.
pub(crate) fn build_engine(config: &MatchingConfig) -> Result<MatchEngine, AppError> {
    build_engine_with_cvs(config, config.verified_candidates.iter().cloned(), Vec::new())
}

pub(crate) fn build_engine_with_cvs<I>(
    config: &MatchingConfig,
    verified: I,
    documents: Vec<(DocumentRef, Vec<String>)>,
) -> Result<MatchEngine, AppError>
where
    I: IntoIterator<Item = String>,
{
    let taxonomy = load_taxonomy(config)?;
    let cv_index = documents
        .into_iter()
        .fold(InMemoryCvIndex::new(taxonomy.clone()), |index, (document, skills)| {
            index.with_document(&document, skills)
        });

    Ok(MatchEngine::new(
        Arc::new(StaticVerificationDirectory::new(verified)),
        config,
    )
    .with_taxonomy(taxonomy)
    .with_cv_scorer(Arc::new(cv_index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[tokio::test]
    async fn directory_verifies_listed_candidates_only() {
        let directory = StaticVerificationDirectory::new(["cand-1"]);

        let listed = directory
            .is_verified(&CandidateId("cand-1".to_string()))
            .await
            .expect("lookup");
        let unlisted = directory
            .is_verified(&CandidateId("cand-2".to_string()))
            .await
            .expect("lookup");

        assert!(listed);
        assert!(!unlisted);
    }

    #[tokio::test]
    async fn cv_index_scores_known_documents_with_taxonomy() {
        let document = DocumentRef("cv-1".to_string());
        let index = InMemoryCvIndex::new(Arc::new(SkillTaxonomy::builtin()))
            .with_document(&document, skills(&["ReactJS", "Postgres"]));

        let score = index
            .score_cv_skills(&document, &skills(&["React", "SQL"]))
            .await
            .expect("document indexed");
        assert!((score - 1.0).abs() < 1e-9);

        let missing = index
            .score_cv_skills(&DocumentRef("cv-2".to_string()), &skills(&["React"]))
            .await;
        assert!(matches!(missing, Err(CvScoringError::DocumentNotFound(_))));
    }
}
