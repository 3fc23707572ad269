use serde::{Deserialize, Serialize};

use super::super::domain::{to_percentage, MatchResult};
use super::super::eligibility::{EligibilityOutcome, FailedCriterion};

/// Width, in percentage points, of the warning window below a job's threshold.
pub const GRACE_BAND_POINTS: f64 = 10.0;

/// Submission decision derived from the eligibility gate and the gated total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GatingDecision {
    Proceed {
        match_percentage: f64,
    },
    ProceedWithWarning {
        match_percentage: f64,
        threshold: f64,
    },
    Blocked {
        match_percentage: f64,
        reasons: Vec<BlockReason>,
    },
}

impl GatingDecision {
    pub fn allows_submission(&self) -> bool {
        !matches!(self, GatingDecision::Blocked { .. })
    }

    pub fn has_warning(&self) -> bool {
        matches!(self, GatingDecision::ProceedWithWarning { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            GatingDecision::Proceed { match_percentage } => {
                format!("application may proceed ({match_percentage:.0}% match)")
            }
            GatingDecision::ProceedWithWarning {
                match_percentage,
                threshold,
            } => format!(
                "application may proceed with a warning: {match_percentage:.0}% is below the {threshold:.0}% threshold"
            ),
            GatingDecision::Blocked { reasons, .. } => {
                let details: Vec<String> = reasons.iter().map(BlockReason::summary).collect();
                format!("application blocked: {}", details.join("; "))
            }
        }
    }

    /// Essential-criterion failures carried by a blocked decision.
    pub fn failed_criteria(&self) -> Vec<FailedCriterion> {
        match self {
            GatingDecision::Blocked { reasons, .. } => reasons
                .iter()
                .filter_map(|reason| match reason {
                    BlockReason::EssentialCriterion(failure) => Some(failure.clone()),
                    BlockReason::BelowThreshold { .. } => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Why a submission was hard-blocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockReason {
    EssentialCriterion(FailedCriterion),
    BelowThreshold { threshold: f64, floor: f64 },
}

impl BlockReason {
    pub fn summary(&self) -> String {
        match self {
            BlockReason::EssentialCriterion(failure) => {
                format!("{}: {}", failure.criterion.label(), failure.reason)
            }
            BlockReason::BelowThreshold { threshold, floor } => format!(
                "match score below the {floor:.0}% floor for a {threshold:.0}% threshold"
            ),
        }
    }
}

/// Combine the eligibility outcome with the gated total (0..1) against a 0-100 threshold.
pub fn decide(eligibility: &EligibilityOutcome, gated_total: f64, threshold: f64) -> GatingDecision {
    // Same whole-number percentage that is persisted with the submission.
    let match_percentage = f64::from(to_percentage(gated_total));
    let floor = threshold - GRACE_BAND_POINTS;

    let mut reasons: Vec<BlockReason> = eligibility
        .failed_criteria
        .iter()
        .cloned()
        .map(BlockReason::EssentialCriterion)
        .collect();

    if match_percentage < floor {
        reasons.push(BlockReason::BelowThreshold { threshold, floor });
    }

    if !eligibility.is_valid || !reasons.is_empty() {
        return GatingDecision::Blocked {
            match_percentage,
            reasons,
        };
    }

    if match_percentage >= threshold {
        GatingDecision::Proceed { match_percentage }
    } else {
        GatingDecision::ProceedWithWarning {
            match_percentage,
            threshold,
        }
    }
}

/// Gating decision for a finished evaluation against the job's own threshold.
pub fn decide_for(result: &MatchResult, threshold: f64) -> GatingDecision {
    decide(&result.eligibility, result.gated_total, threshold)
}
