use serde::{Deserialize, Serialize};

use super::super::domain::DimensionScores;

/// Fixed dimension weights of the compatibility score.
pub const MATCH_WEIGHTS: MatchWeights = MatchWeights {
    title: 0.35,
    specialization: 0.25,
    location: 0.15,
    experience: 0.15,
    salary: 0.10,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub title: f64,
    pub specialization: f64,
    pub location: f64,
    pub experience: f64,
    pub salary: f64,
}

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.title + self.specialization + self.location + self.experience + self.salary
    }

    /// Weighted sum of the five dimension scores, clamped to [0,1].
    pub fn total(&self, scores: &DimensionScores) -> f64 {
        let total = scores.title * self.title
            + scores.specialization * self.specialization
            + scores.location * self.location
            + scores.experience * self.experience
            + scores.salary * self.salary;
        total.clamp(0.0, 1.0)
    }
}
