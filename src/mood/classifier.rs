use super::lexicon::{MoodLexicon, DEFAULT_LEXICON};
use super::sentiment::{LexiconPolarity, PolarityScorer};
use super::title_rules::apply_title_rules;
use super::{Mood, MoodLabel};
use tracing::debug;

/// Minimum winning score for a label other than `unknown`.
pub const CONFIDENCE_FLOOR: u32 = 2;

const PRIMARY_KEYWORD_POINTS: u32 = 2;
const SECONDARY_KEYWORD_POINTS: u32 = 3;
const INDICATOR_POINTS: u32 = 1;
const PATTERN_POINTS: u32 = 2;

/// Accumulated evidence per mood. Scores only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreVector([u32; 6]);

impl ScoreVector {
    pub fn add(&mut self, mood: Mood, points: u32) {
        self.0[mood.index()] += points;
    }

    pub fn get(&self, mood: Mood) -> u32 {
        self.0[mood.index()]
    }

    /// Highest scoring mood, earliest in declaration order on ties, or
    /// `Unknown` when every score is zero or the best is below the floor.
    pub fn winner(&self) -> MoodLabel {
        let mut best: Option<(Mood, u32)> = None;
        for mood in Mood::ALL {
            let score = self.get(mood);
            if score == 0 {
                continue;
            }
            match best {
                Some((_, best_score)) if best_score >= score => {}
                _ => best = Some((mood, score)),
            }
        }
        match best {
            Some((mood, score)) if score >= CONFIDENCE_FLOOR => MoodLabel::Known(mood),
            _ => MoodLabel::Unknown,
        }
    }
}

pub struct MoodClassifier {
    lexicon: &'static MoodLexicon,
    polarity: Box<dyn PolarityScorer>,
}

impl Default for MoodClassifier {
    fn default() -> Self {
        MoodClassifier::new(&DEFAULT_LEXICON, Box::new(LexiconPolarity::default()))
    }
}

impl MoodClassifier {
    pub fn new(lexicon: &'static MoodLexicon, polarity: Box<dyn PolarityScorer>) -> Self {
        MoodClassifier { lexicon, polarity }
    }

    pub fn classify(&self, title: &str, description: Option<&str>, tags: &[String]) -> MoodLabel {
        let scores = self.score(title, description, tags);
        let label = scores.winner();
        debug!("Classified '{}' as {} ({:?})", title, label, scores);
        label
    }

    pub fn score(&self, title: &str, description: Option<&str>, tags: &[String]) -> ScoreVector {
        let combined = format!("{} {}", title, description.unwrap_or_default()).to_lowercase();
        let tag_text = tags.join(" ").to_lowercase();
        let mut scores = ScoreVector::default();

        self.add_lexical_scores(&combined, &tag_text, &mut scores);
        self.add_pattern_scores(&combined, &mut scores);
        self.add_sentiment_scores(&combined, &mut scores);
        apply_title_rules(title, &mut scores);

        scores
    }

    fn add_lexical_scores(&self, combined: &str, tag_text: &str, scores: &mut ScoreVector) {
        for (mood, signals) in self.lexicon.iter() {
            for keyword in signals.primary_keywords {
                if combined.contains(keyword) || tag_text.contains(keyword) {
                    scores.add(mood, PRIMARY_KEYWORD_POINTS);
                }
            }
            for keyword in signals.secondary_keywords {
                if combined.contains(keyword) {
                    scores.add(mood, SECONDARY_KEYWORD_POINTS);
                }
            }
            for indicator in signals.indicators {
                if combined.contains(indicator) {
                    scores.add(mood, INDICATOR_POINTS);
                }
            }
        }
    }

    fn add_pattern_scores(&self, combined: &str, scores: &mut ScoreVector) {
        for (mood, signals) in self.lexicon.iter() {
            for pattern in &signals.patterns {
                if pattern.is_match(combined) {
                    scores.add(mood, PATTERN_POINTS);
                }
            }
        }
    }

    fn add_sentiment_scores(&self, combined: &str, scores: &mut ScoreVector) {
        let polarity = match self.polarity.polarity(combined) {
            Ok(p) => p,
            Err(err) => {
                debug!("Polarity scoring failed, treating as neutral: {:#}", err);
                0.0
            }
        };
        if polarity > 0.3 {
            scores.add(Mood::Happy, 3);
            scores.add(Mood::Energetic, 1);
        } else if polarity > 0.1 {
            scores.add(Mood::Happy, 2);
        } else if polarity < -0.3 {
            scores.add(Mood::Sad, 3);
        } else if polarity < -0.1 {
            scores.add(Mood::Sad, 1);
        }
    }
}
