//! Human-readable rendering of a match breakdown.

use serde::{Deserialize, Serialize};

use super::domain::MatchPercentages;

const AFFIRMATIVE: u8 = 80;
const QUALIFIED: u8 = 50;

/// Qualitative bucket for a 0-100 total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchLabel {
    Excellent,
    Strong,
    Good,
    Fair,
    Weak,
}

impl MatchLabel {
    pub fn from_percentage(total: u8) -> Self {
        match total {
            90.. => MatchLabel::Excellent,
            80..=89 => MatchLabel::Strong,
            70..=79 => MatchLabel::Good,
            60..=69 => MatchLabel::Fair,
            _ => MatchLabel::Weak,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MatchLabel::Excellent => "Excellent",
            MatchLabel::Strong => "Strong",
            MatchLabel::Good => "Good",
            MatchLabel::Fair => "Fair",
            MatchLabel::Weak => "Weak",
        }
    }
}

struct Statements {
    affirmative: &'static str,
    qualified: &'static str,
    negative: &'static str,
}

impl Statements {
    fn pick(&self, percentage: u8) -> &'static str {
        if percentage >= AFFIRMATIVE {
            self.affirmative
        } else if percentage >= QUALIFIED {
            self.qualified
        } else {
            self.negative
        }
    }
}

const TITLE: Statements = Statements {
    affirmative: "Your job title closely matches the advertised role.",
    qualified: "Your job title is related to the advertised role, but not an exact match.",
    negative: "Your job title does not match the advertised role.",
};

const SPECIALIZATION: Statements = Statements {
    affirmative: "Your experience aligns with the role's specialization.",
    qualified: "Your experience partially covers the role's specialization.",
    negative: "Your experience does not reflect the role's specialization.",
};

const LOCATION: Statements = Statements {
    affirmative: "The job is in one of your preferred locations.",
    qualified: "The job location only partly matches your preferences.",
    negative: "The job is outside your preferred locations.",
};

const EXPERIENCE: Statements = Statements {
    affirmative: "You meet the experience requirement.",
    qualified: "You are slightly short of the experience requirement.",
    negative: "You do not meet the experience requirement.",
};

const SALARY: Statements = Statements {
    affirmative: "Your salary expectations fit the offered range.",
    qualified: "Your salary expectations partly overlap the offered range.",
    negative: "Your salary expectations are outside the offered range.",
};

/// One sentence per dimension, newline separated, in title, specialization, location,
/// experience, salary order.
pub fn generate_explanation(breakdown: &MatchPercentages) -> String {
    [
        TITLE.pick(breakdown.title),
        SPECIALIZATION.pick(breakdown.specialization),
        LOCATION.pick(breakdown.location),
        EXPERIENCE.pick(breakdown.experience),
        SALARY.pick(breakdown.salary),
    ]
    .join("\n")
}

pub fn match_label(total: u8) -> MatchLabel {
    MatchLabel::from_percentage(total)
}
