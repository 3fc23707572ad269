use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

/// Curated synonym groups. The substring pass takes the first group, in table order, with a label
/// containing (or contained in) the skill, so short unknown labels can land in an unrelated group.
const BUILTIN_GROUPS: &[&[&str]] = &[
    &["React", "React.js", "ReactJS"],
    &["Angular", "AngularJS", "Angular.js"],
    &["Vue", "Vue.js", "VueJS"],
    &["Node.js", "NodeJS", "Node"],
    &["JavaScript", "ECMAScript", "ES6", "Vanilla JS"],
    &["TypeScript", "TSX"],
    &["HTML", "HTML5"],
    &["CSS", "CSS3", "SCSS", "Sass"],
    &["Python", "Python3", "Django", "Flask"],
    &["Java", "J2EE", "Java EE", "Spring Boot"],
    &["C#", ".NET", "ASP.NET", "dotnet"],
    &["AWS", "Amazon Web Services", "EC2", "S3"],
    &["Azure", "Microsoft Azure"],
    &["GCP", "Google Cloud", "Google Cloud Platform"],
    &["Docker", "Containers", "Containerization"],
    &["Kubernetes", "K8s"],
    &["PostgreSQL", "Postgres", "MySQL", "SQL"],
    &["MongoDB", "NoSQL", "Cassandra"],
    &["CI/CD", "Jenkins", "GitHub Actions", "GitLab CI"],
    &["Machine Learning", "Deep Learning", "TensorFlow", "PyTorch"],
    &["Project Management", "PMP", "Prince2"],
    &["Agile", "Scrum", "Kanban"],
];

/// Credit for a required skill that only partially overlaps a candidate skill.
const PARTIAL_MATCH_CREDIT: f64 = 0.7;
/// Share of the blended skill score taken from the CV scorer.
const CV_BLEND_WEIGHT: f64 = 0.5;

/// Set of labels treated as equivalent for fuzzy matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymGroup {
    key: String,
    labels: Vec<String>,
    lowered: Vec<String>,
}

impl SynonymGroup {
    fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut group = Self {
            key: String::new(),
            labels: Vec::new(),
            lowered: Vec::new(),
        };
        for label in labels {
            group.push(label.into());
        }
        group.key = group.lowered.first().cloned().unwrap_or_default();
        group
    }

    fn singleton(skill: &str) -> Self {
        Self::new([skill.trim()])
    }

    fn push(&mut self, label: String) {
        let label = label.trim().to_string();
        let lowered = label.to_lowercase();
        if label.is_empty() || self.lowered.contains(&lowered) {
            return;
        }
        self.labels.push(label);
        self.lowered.push(lowered);
    }

    /// Lowercased canonical label; used to deduplicate required skills.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn contains(&self, skill: &str) -> bool {
        let needle = skill.trim().to_lowercase();
        self.lowered.iter().any(|label| *label == needle)
    }

    fn lowered(&self) -> impl Iterator<Item = &str> {
        self.lowered.iter().map(String::as_str)
    }
}

/// Error raised while loading additional synonym groups.
#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    #[error("failed to read skill taxonomy: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid skill taxonomy CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("skill taxonomy row {row} has an empty group or label")]
    EmptyLabel { row: usize },
}

#[derive(Debug, Deserialize)]
struct TaxonomyRow {
    group: String,
    label: String,
}

/// Synonym resolver and fuzzy skill-overlap scorer.
#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    groups: Vec<SynonymGroup>,
}

impl Default for SkillTaxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SkillTaxonomy {
    pub fn builtin() -> Self {
        Self {
            groups: BUILTIN_GROUPS
                .iter()
                .map(|labels| SynonymGroup::new(labels.iter().copied()))
                .collect(),
        }
    }

    /// Built-in groups extended with rows from a `group,label` CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TaxonomyError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TaxonomyError> {
        let mut taxonomy = Self::builtin();
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        for (index, record) in csv_reader.deserialize::<TaxonomyRow>().enumerate() {
            let row = record?;
            if row.group.is_empty() || row.label.is_empty() {
                return Err(TaxonomyError::EmptyLabel { row: index + 1 });
            }
            taxonomy.merge(&row.group, row.label);
        }

        Ok(taxonomy)
    }

    fn merge(&mut self, group: &str, label: String) {
        let key = group.to_lowercase();
        match self.groups.iter_mut().find(|existing| existing.key == key) {
            Some(existing) => existing.push(label),
            None => self.groups.push(SynonymGroup::new([group.to_string(), label])),
        }
    }

    pub fn groups(&self) -> &[SynonymGroup] {
        &self.groups
    }

    /// Resolve the synonym group of `skill`, case-insensitively.
    ///
    /// Exact membership wins over substring containment; an unknown label resolves to a
    /// singleton group holding only itself.
    pub fn find_similar_skills(&self, skill: &str) -> SynonymGroup {
        let needle = skill.trim().to_lowercase();
        if needle.is_empty() {
            return SynonymGroup::singleton(skill);
        }

        if let Some(group) = self
            .groups
            .iter()
            .find(|group| group.lowered().any(|label| label == needle))
        {
            return group.clone();
        }

        self.groups
            .iter()
            .find(|group| group.lowered().any(|label| overlaps(label, &needle)))
            .cloned()
            .unwrap_or_else(|| SynonymGroup::singleton(skill))
    }

    /// Profile-only fuzzy overlap of `candidate_skills` against `required_skills`, in [0,1].
    ///
    /// Required skills resolving to an already scored group add nothing, but still count in
    /// the denominator. Either list being empty scores 0.
    pub fn skills_match_score(&self, candidate_skills: &[String], required_skills: &[String]) -> f64 {
        let candidate_lowered: Vec<String> = candidate_skills
            .iter()
            .map(|skill| skill.trim().to_lowercase())
            .filter(|skill| !skill.is_empty())
            .collect();

        if candidate_lowered.is_empty() || required_skills.is_empty() {
            return 0.0;
        }

        let candidate_groups: Vec<SynonymGroup> = candidate_skills
            .iter()
            .filter(|skill| !skill.trim().is_empty())
            .map(|skill| self.find_similar_skills(skill))
            .collect();

        let mut processed: HashSet<String> = HashSet::new();
        let mut score = 0.0;

        for required in required_skills {
            let group = self.find_similar_skills(required);
            if group.key.is_empty() || !processed.insert(group.key.clone()) {
                continue;
            }

            let exact = group
                .lowered()
                .any(|synonym| candidate_lowered.iter().any(|skill| skill == synonym));
            if exact {
                score += 1.0;
                continue;
            }

            let partial = group.lowered().any(|synonym| {
                candidate_groups
                    .iter()
                    .flat_map(|group| group.lowered())
                    .any(|candidate| overlaps(synonym, candidate))
            });
            if partial {
                score += PARTIAL_MATCH_CREDIT;
            }
        }

        (score / required_skills.len() as f64).clamp(0.0, 1.0)
    }
}

/// Equal-weight blend of the profile skill score with a CV-derived score.
pub fn blend_with_cv(profile_score: f64, cv_score: f64) -> f64 {
    let blended = (1.0 - CV_BLEND_WEIGHT) * profile_score + CV_BLEND_WEIGHT * cv_score;
    blended.clamp(0.0, 1.0)
}

fn overlaps(left: &str, right: &str) -> bool {
    !left.is_empty() && !right.is_empty() && (left.contains(right) || right.contains(left))
}
