//! Integration scenarios for candidate matching and application intake.
//!
//! Everything goes through the public engine, service and router so JSON payloads, gating and
//! persistence are exercised the way an API client sees them.

mod common {
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use talent_match::config::MatchingConfig;
    use talent_match::matching::{
        ApplicationId, ApplicationRecord, ApplicationRepository, ApplicationService, CandidateId,
        JobId, MatchEngine, RepositoryError, VerificationError, VerificationLookup,
    };

    pub(super) struct Directory(pub(super) HashSet<String>);

    #[async_trait]
    impl VerificationLookup for Directory {
        async fn is_verified(
            &self,
            candidate_id: &CandidateId,
        ) -> Result<bool, VerificationError> {
            Ok(self.0.contains(&candidate_id.0))
        }
    }

    #[derive(Default)]
    pub(super) struct Store {
        records: Mutex<HashMap<ApplicationId, ApplicationRecord>>,
    }

    impl ApplicationRepository for Store {
        fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("store mutex poisoned");
            if guard.contains_key(&record.application_id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.application_id.clone(), record.clone());
            Ok(record)
        }

        fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
            Ok(self.records.lock().expect("store mutex poisoned").get(id).cloned())
        }

        fn for_job(&self, job_id: &JobId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("store mutex poisoned")
                .values()
                .filter(|record| &record.job_id == job_id)
                .cloned()
                .collect())
        }
    }

    pub(super) fn engine(verified: &[&str]) -> MatchEngine {
        let config = MatchingConfig {
            verification_timeout: Duration::from_millis(100),
            ..MatchingConfig::default()
        };
        let directory = Directory(verified.iter().map(|id| id.to_string()).collect());
        MatchEngine::new(Arc::new(directory), &config)
    }

    pub(super) fn service(verified: &[&str]) -> (Arc<ApplicationService<Store>>, Arc<Store>) {
        let store = Arc::new(Store::default());
        let service = Arc::new(ApplicationService::new(store.clone(), engine(verified)));
        (service, store)
    }

    pub(super) fn job_json() -> Value {
        json!({
            "job_id": "job-backend-7",
            "title": "Backend Engineer",
            "specialization": "Backend",
            "location": "Berlin",
            "min_years_experience": 4,
            "salary": { "min": 70000.0, "max": 90000.0 },
            "required_skills": ["Python", "PostgreSQL", "Docker"],
            "required_qualifications": ["MSc"],
            "required_citizenship": "EU Citizen",
            "match_threshold": 75.0,
            "essential": { "years_experience": true, "citizenship": true }
        })
    }

    pub(super) fn candidate_json(id: &str) -> Value {
        json!({
            "candidate_id": id,
            "job_titles": ["Backend Engineer", "Python Developer"],
            "years_experience": 5,
            "locations": ["Berlin"],
            "salary": { "min": 75000.0, "max": 85000.0 },
            "skills": ["Django", "Postgres", "Kubernetes"],
            "qualifications": ["MSc Computer Science"],
            "work_eligibility": "EU Citizen"
        })
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use talent_match::matching::{
    application_router, ApplicationRepository, ApplicationServiceError, ApplicationStatus,
    ApplicationSubmission, BatchCandidate, CandidateProfile, Criterion, JobId, JobVacancy,
    MatchLabel,
};

use common::*;

fn submission(candidate: Value) -> ApplicationSubmission {
    serde_json::from_value(json!({ "candidate": candidate, "job": job_json() }))
        .expect("submission parses")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn verified_candidate_is_scored_and_accepted() {
    let (service, store) = service(&["cand-lena"]);

    let record = service
        .submit(submission(candidate_json("cand-lena")))
        .await
        .expect("application accepted");

    assert_eq!(record.status, ApplicationStatus::Submitted);
    assert_eq!(record.match_label, MatchLabel::Excellent);
    assert_eq!(record.match_score_breakdown.title, 100);
    assert_eq!(record.match_score_breakdown.location, 100);
    let stored = store
        .for_job(&JobId("job-backend-7".to_string()))
        .expect("listing");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].application_id, record.application_id);
}

#[tokio::test]
async fn unverified_candidate_scores_zero_and_is_blocked() {
    let (service, store) = service(&[]);

    let err = service
        .submit(submission(candidate_json("cand-anon")))
        .await
        .expect_err("blocked");

    match err {
        ApplicationServiceError::Blocked { result, .. } => {
            assert!(result.weighted_total > 0.8);
            assert_eq!(result.gated_total, 0.0);
            assert!(result.eligibility.is_valid);
        }
        other => panic!("expected blocked submission, got {other:?}"),
    }
    assert!(store
        .for_job(&JobId("job-backend-7".to_string()))
        .expect("listing")
        .is_empty());
}

#[tokio::test]
async fn skill_compatibility_uses_synonyms_but_not_the_weighted_total() {
    let engine = engine(&["cand-lena"]);
    let profile: CandidateProfile =
        serde_json::from_value(candidate_json("cand-lena")).expect("profile");
    let job: JobVacancy = serde_json::from_value(job_json()).expect("job");

    let with_synonyms = engine.evaluate(&profile, &job, None).await;

    let mut bare = profile.clone();
    bare.skills.clear();
    let without_skills = engine.evaluate(&bare, &job, None).await;

    // Django resolves to Python and Postgres to PostgreSQL; Kubernetes does not cover Docker.
    assert!((with_synonyms.skill_compatibility - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(without_skills.skill_compatibility, 0.0);
    assert_eq!(with_synonyms.weighted_total, without_skills.weighted_total);
}

#[tokio::test]
async fn batch_evaluation_reports_each_candidate_in_order() {
    let engine = engine(&["cand-a", "cand-c"]);
    let job: JobVacancy = serde_json::from_value(job_json()).expect("job");

    let mut ineligible: CandidateProfile =
        serde_json::from_value(candidate_json("cand-c")).expect("profile");
    ineligible.work_eligibility = None;

    let batch = vec![
        BatchCandidate {
            profile: serde_json::from_value(candidate_json("cand-a")).expect("profile"),
            cv_document: None,
        },
        BatchCandidate {
            profile: serde_json::from_value(candidate_json("cand-b")).expect("profile"),
            cv_document: None,
        },
        BatchCandidate {
            profile: ineligible,
            cv_document: None,
        },
    ];

    let results = engine.evaluate_batch(&job, batch).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].candidate_id.0, "cand-a");
    assert!(results[0].verified);
    assert_eq!(results[1].candidate_id.0, "cand-b");
    assert!(!results[1].verified);
    assert!(results[2].eligibility.failed(Criterion::Citizenship));
}

#[tokio::test]
async fn http_flow_submits_and_reads_back_application() {
    let (service, _) = service(&["cand-lena"]);
    let app = application_router(Arc::clone(&service));
    let payload = json!({ "candidate": candidate_json("cand-lena"), "job": job_json() });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/applications")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let created = body_json(response).await;
    let application_id = created["application_id"].as_str().expect("id").to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/applications/{application_id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["status"], "submitted");
    assert_eq!(fetched["job_id"], "job-backend-7");
    assert_eq!(fetched["match_explanation"], created["match_explanation"]);
}

#[tokio::test]
async fn http_flow_rejects_ineligible_candidate() {
    let (service, _) = service(&["cand-remote"]);
    let app = application_router(service);
    let mut candidate = candidate_json("cand-remote");
    candidate["years_experience"] = json!(2);
    let payload = json!({ "candidate": candidate, "job": job_json() });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/applications")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["failed_criteria"][0]["criterion"], "years_experience");
}
