use crate::infra::{build_engine_with_cvs, InMemoryApplicationRepository};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use talent_match::config::{AppConfig, MatchingConfig};
use talent_match::error::AppError;
use talent_match::matching::{
    decide_for, ApplicationRepository, ApplicationService, ApplicationSubmission, BatchCandidate,
    CandidateId, CandidateProfile, DocumentRef, EssentialCriteria, GatingDecision, JobId,
    JobVacancy, MatchPreview, MatchResult, SalaryRange,
};
use talent_match::telemetry;

const CLI_CV_DOCUMENT: &str = "cli-cv";

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Path to a candidate profile JSON document
    #[arg(long)]
    pub(crate) candidate: PathBuf,
    /// Path to a job vacancy JSON document
    #[arg(long)]
    pub(crate) job: PathBuf,
    /// Treat the candidate as verified for this run
    #[arg(long)]
    pub(crate) verified: bool,
    /// Skills extracted from the candidate's CV, comma separated
    #[arg(long, value_delimiter = ',')]
    pub(crate) cv_skills: Vec<String>,
    /// Print the evaluation as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Also submit every allowed candidate through the application workflow
    #[arg(long)]
    pub(crate) submit: bool,
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        candidate,
        job,
        verified,
        cv_skills,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let profile: CandidateProfile = read_json(&candidate)?;
    let job: JobVacancy = read_json(&job)?;

    let cv_skills: Vec<String> = cv_skills
        .into_iter()
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect();
    let cv_document = (!cv_skills.is_empty()).then(|| DocumentRef(CLI_CV_DOCUMENT.to_string()));
    let documents = cv_document
        .iter()
        .map(|document| (document.clone(), cv_skills.clone()))
        .collect();

    let mut verified_ids = config.matching.verified_candidates.clone();
    if verified {
        verified_ids.push(profile.candidate_id.0.clone());
    }
    let engine = build_engine_with_cvs(&config.matching, verified_ids, documents)?;

    let result = engine.evaluate(&profile, &job, cv_document.as_ref()).await;
    let decision = decide_for(&result, job.match_threshold);

    if json {
        let preview = MatchPreview { result, decision };
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        render_evaluation(&result, &decision);
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { submit } = args;
    let matching = MatchingConfig::default();

    let job = demo_job();
    let candidates = demo_candidates();
    let documents = vec![(
        DocumentRef("cv-amira".to_string()),
        strings(&["React", "TypeScript", "GraphQL", "Jest"]),
    )];
    let verified = ["cand-amira", "cand-ben", "cand-chloe"]
        .into_iter()
        .map(str::to_string);
    let engine = build_engine_with_cvs(&matching, verified, documents)?;

    println!("Talent match demo");
    println!(
        "Vacancy {} - {} ({}), threshold {:.0}%",
        job.job_id.0,
        job.title,
        job.location.as_deref().unwrap_or("any location"),
        job.match_threshold
    );

    let results = engine.evaluate_batch(&job, candidates.clone()).await;
    for result in &results {
        println!();
        let decision = decide_for(result, job.match_threshold);
        render_evaluation(result, &decision);
    }

    if !submit {
        return Ok(());
    }

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let service = ApplicationService::new(repository.clone(), engine);
    println!("\nApplication intake");
    for candidate in candidates {
        let submission = ApplicationSubmission {
            candidate: candidate.profile,
            job: job.clone(),
            cv_document: candidate.cv_document,
        };
        let candidate_id = submission.candidate.candidate_id.0.clone();
        match service.submit(submission).await {
            Ok(record) => println!(
                "  {candidate_id}: {} as {} at {} ({}% {})",
                record.status.label(),
                record.application_id.0,
                record.submitted_at.format("%Y-%m-%d %H:%M UTC"),
                record.match_percentage,
                record.match_label.label()
            ),
            Err(err) => println!("  {candidate_id}: {err}"),
        }
    }

    match repository.for_job(&job.job_id) {
        Ok(records) => println!("  {} application(s) stored for {}", records.len(), job.job_id.0),
        Err(err) => println!("  Repository unavailable: {err}"),
    }

    Ok(())
}

fn read_json<T>(path: &Path) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn render_evaluation(result: &MatchResult, decision: &GatingDecision) {
    let percentages = result.percentages();
    println!(
        "Candidate {} vs {}: {}% ({})",
        result.candidate_id.0,
        result.job_id.0,
        result.match_percentage(),
        result.label.label()
    );
    println!(
        "  Breakdown: title {}%, specialization {}%, location {}%, experience {}%, salary {}%",
        percentages.title,
        percentages.specialization,
        percentages.location,
        percentages.experience,
        percentages.salary
    );
    println!(
        "  Weighted total {:.3}, verified {}, gated total {:.3}",
        result.weighted_total, result.verified, result.gated_total
    );
    println!(
        "  Skill compatibility {:.0}%",
        result.skill_compatibility * 100.0
    );

    if result.eligibility.is_valid {
        println!("  Essential criteria: all met");
    } else {
        println!("  Essential criteria failed:");
        for failure in &result.eligibility.failed_criteria {
            println!("  - {}: {}", failure.criterion.label(), failure.reason);
        }
    }

    println!("  Decision: {}", decision.summary());
    for line in result.explanation.lines() {
        println!("  {line}");
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn demo_job() -> JobVacancy {
    JobVacancy {
        job_id: JobId("job-frontend-001".to_string()),
        title: "Frontend Developer".to_string(),
        specialization: Some("Frontend".to_string()),
        location: Some("London".to_string()),
        min_years_experience: 4,
        min_years_in_title: 2,
        salary: Some(SalaryRange::new(55_000.0, 75_000.0)),
        required_skills: strings(&["React", "TypeScript", "GraphQL"]),
        required_qualifications: strings(&["BSc"]),
        required_citizenship: Some("UK Citizen".to_string()),
        match_threshold: 70.0,
        essential: EssentialCriteria {
            title: false,
            years_experience: true,
            skills: false,
            qualification: false,
            salary: true,
            citizenship: true,
        },
    }
}

fn demo_candidates() -> Vec<BatchCandidate> {
    let amira = CandidateProfile {
        candidate_id: CandidateId("cand-amira".to_string()),
        job_titles: strings(&["Frontend Developer"]),
        years_experience: Some(6),
        years_in_current_title: Some(3),
        locations: strings(&["London"]),
        salary: Some(SalaryRange::new(60_000.0, 70_000.0)),
        skills: strings(&["ReactJS", "TypeScript"]),
        qualifications: strings(&["BSc Software Engineering"]),
        additional_qualifications: None,
        work_eligibility: Some("UK Citizen".to_string()),
        current_employer: Some("Contoso".to_string()),
    };

    let ben = CandidateProfile {
        candidate_id: CandidateId("cand-ben".to_string()),
        job_titles: strings(&["Backend Developer"]),
        years_experience: Some(3),
        years_in_current_title: Some(2),
        locations: strings(&["Manchester"]),
        salary: Some(SalaryRange::new(50_000.0, 60_000.0)),
        skills: strings(&["Vue", "JavaScript"]),
        additional_qualifications: Some("BSc Mathematics".to_string()),
        ..amira.clone()
    };

    let chloe = CandidateProfile {
        candidate_id: CandidateId("cand-chloe".to_string()),
        job_titles: strings(&["Data Engineer"]),
        years_experience: Some(8),
        locations: strings(&["London", "Remote"]),
        salary: Some(SalaryRange::new(90_000.0, 110_000.0)),
        skills: strings(&["Python", "AWS"]),
        work_eligibility: Some("Requires sponsorship".to_string()),
        ..amira.clone()
    };

    let dev = CandidateProfile {
        candidate_id: CandidateId("cand-dev".to_string()),
        ..amira.clone()
    };

    vec![
        BatchCandidate {
            profile: amira,
            cv_document: Some(DocumentRef("cv-amira".to_string())),
        },
        BatchCandidate {
            profile: ben,
            cv_document: None,
        },
        BatchCandidate {
            profile: chloe,
            cv_document: None,
        },
        BatchCandidate {
            profile: dev,
            cv_document: None,
        },
    ]
}
