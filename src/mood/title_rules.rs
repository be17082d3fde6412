use super::{Mood, ScoreVector};

/// A hand-tuned boost for a family of known song titles.
///
/// When the lower-cased title contains any of `triggers`, the rule adds
/// `with_qualifier` if the title also contains any of `qualifiers`, and
/// `otherwise` when it doesn't.
pub(crate) struct TitleRule {
    pub triggers: &'static [&'static str],
    pub qualifiers: &'static [&'static str],
    pub with_qualifier: &'static [(Mood, u32)],
    pub otherwise: &'static [(Mood, u32)],
}

pub(crate) const TITLE_RULES: &[TitleRule] = &[
    // "Don't Worry Baby" and friends.
    TitleRule {
        triggers: &["worry", "baby", "chinnamma", "don't worry"],
        qualifiers: &["dance", "party", "beat", "gana"],
        with_qualifier: &[(Mood::Energetic, 5)],
        otherwise: &[(Mood::Happy, 3)],
    },
    // "Akasha Ishte" style romance.
    TitleRule {
        triggers: &["ishte", "isthe"],
        qualifiers: &["akasha", "aakasha"],
        with_qualifier: &[(Mood::Romantic, 4), (Mood::Happy, 2)],
        otherwise: &[(Mood::Romantic, 3)],
    },
    // Gana and folk songs.
    TitleRule {
        triggers: &["gana", "folk"],
        qualifiers: &[],
        with_qualifier: &[],
        otherwise: &[(Mood::Energetic, 4)],
    },
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

pub(crate) fn apply_title_rules(title: &str, scores: &mut ScoreVector) {
    let title = title.to_lowercase();
    for rule in TITLE_RULES {
        if !contains_any(&title, rule.triggers) {
            continue;
        }
        let boosts = if contains_any(&title, rule.qualifiers) {
            rule.with_qualifier
        } else {
            rule.otherwise
        };
        for (mood, points) in boosts {
            scores.add(*mood, *points);
        }
    }
}
