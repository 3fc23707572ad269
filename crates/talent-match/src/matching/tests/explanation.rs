use crate::matching::domain::MatchPercentages;
use crate::matching::explanation::{generate_explanation, match_label, MatchLabel};

fn breakdown(title: u8, specialization: u8, location: u8, experience: u8, salary: u8) -> MatchPercentages {
    MatchPercentages {
        title,
        specialization,
        location,
        experience,
        salary,
        total: 0,
    }
}

#[test]
fn one_sentence_per_dimension_in_fixed_order() {
    let explanation = generate_explanation(&breakdown(100, 100, 100, 100, 100));
    let lines: Vec<&str> = explanation.lines().collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Your job title closely matches the advertised role.");
    assert!(lines[1].contains("specialization"));
    assert!(lines[2].contains("location"));
    assert!(lines[3].contains("experience"));
    assert!(lines[4].contains("salary"));
}

#[test]
fn tiers_switch_at_eighty_and_fifty() {
    let at_80 = generate_explanation(&breakdown(80, 80, 80, 80, 80));
    let at_79 = generate_explanation(&breakdown(79, 79, 79, 79, 79));
    let at_50 = generate_explanation(&breakdown(50, 50, 50, 50, 50));
    let at_49 = generate_explanation(&breakdown(49, 49, 49, 49, 49));

    assert!(at_80.starts_with("Your job title closely matches"));
    assert!(at_79.starts_with("Your job title is related to"));
    assert_eq!(at_79, at_50);
    assert!(at_49.starts_with("Your job title does not match"));
    assert!(at_49.contains("You do not meet the experience requirement."));
    assert!(at_80.contains("You meet the experience requirement."));
}

#[test]
fn mixed_breakdown_picks_each_tier_independently() {
    let explanation = generate_explanation(&breakdown(100, 0, 100, 80, 75));

    assert_eq!(
        explanation,
        [
            "Your job title closely matches the advertised role.",
            "Your experience does not reflect the role's specialization.",
            "The job is in one of your preferred locations.",
            "You meet the experience requirement.",
            "Your salary expectations partly overlap the offered range.",
        ]
        .join("\n")
    );
}

#[test]
fn labels_bucket_the_total() {
    assert_eq!(match_label(100), MatchLabel::Excellent);
    assert_eq!(match_label(90), MatchLabel::Excellent);
    assert_eq!(match_label(89), MatchLabel::Strong);
    assert_eq!(match_label(80), MatchLabel::Strong);
    assert_eq!(match_label(70), MatchLabel::Good);
    assert_eq!(match_label(60), MatchLabel::Fair);
    assert_eq!(match_label(59), MatchLabel::Weak);
    assert_eq!(match_label(0).label(), "Weak");
}
