use anyhow::Result;
use std::collections::HashMap;

/// Scores the emotional polarity of a text in `[-1.0, 1.0]`.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> Result<f64>;
}

/// Word-list polarity: the mean polarity of every sentiment-bearing word in
/// the text, with intensifiers scaling and negations inverting the word that
/// follows them.
pub struct LexiconPolarity {
    words: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

const WORD_POLARITY: &[(&str, f64)] = &[
    // positive
    ("good", 0.7),
    ("great", 0.8),
    ("best", 1.0),
    ("better", 0.5),
    ("nice", 0.6),
    ("excellent", 1.0),
    ("perfect", 1.0),
    ("love", 0.5),
    ("loved", 0.7),
    ("loving", 0.6),
    ("lovely", 0.5),
    ("happy", 0.8),
    ("happiness", 0.8),
    ("joy", 0.8),
    ("joyful", 0.8),
    ("beautiful", 0.85),
    ("amazing", 0.6),
    ("wonderful", 1.0),
    ("awesome", 1.0),
    ("fantastic", 0.4),
    ("incredible", 0.9),
    ("gorgeous", 0.7),
    ("magical", 0.5),
    ("brilliant", 0.9),
    ("glad", 0.5),
    ("sweet", 0.35),
    ("cute", 0.5),
    ("cool", 0.35),
    ("fun", 0.3),
    ("funny", 0.25),
    ("pretty", 0.25),
    ("pleasant", 0.73),
    ("delightful", 1.0),
    ("superb", 1.0),
    ("favorite", 0.5),
    ("favourite", 0.5),
    ("excited", 0.375),
    ("exciting", 0.3),
    ("enjoy", 0.4),
    ("blessed", 0.5),
    ("cheerful", 0.8),
    ("hopeful", 0.5),
    ("free", 0.4),
    // negative
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("poor", -0.4),
    ("sad", -0.5),
    ("sadness", -0.5),
    ("unhappy", -0.6),
    ("lonely", -0.1),
    ("alone", -0.2),
    ("cry", -0.3),
    ("crying", -0.3),
    ("hate", -0.8),
    ("hurt", -0.4),
    ("broken", -0.4),
    ("painful", -0.7),
    ("pain", -0.6),
    ("tragic", -0.75),
    ("lost", -0.2),
    ("sorry", -0.5),
    ("wrong", -0.5),
    ("cruel", -1.0),
    ("empty", -0.1),
    ("dark", -0.15),
    ("angry", -0.5),
    ("dead", -0.2),
    ("sorrow", -0.6),
    ("miserable", -1.0),
    ("gloomy", -0.6),
    ("boring", -1.0),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("extremely", 1.5),
    ("so", 1.2),
    ("super", 1.3),
    ("absolutely", 1.4),
];

const NEGATIONS: &[&str] = &["not", "never", "no", "don't", "isn't", "wasn't", "can't"];

const NEGATION_FACTOR: f64 = -0.5;

impl Default for LexiconPolarity {
    fn default() -> Self {
        LexiconPolarity {
            words: WORD_POLARITY.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }
}

impl PolarityScorer for LexiconPolarity {
    fn polarity(&self, text: &str) -> Result<f64> {
        let lowered = text.to_lowercase();
        let tokens = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty());

        let mut scores = Vec::new();
        let mut multiplier = 1.0;
        let mut negated = false;
        for token in tokens {
            if NEGATIONS.contains(&token) {
                negated = true;
                continue;
            }
            if let Some(factor) = self.intensifiers.get(token) {
                multiplier *= factor;
                continue;
            }
            if let Some(value) = self.words.get(token) {
                let mut score = value * multiplier;
                if negated {
                    score *= NEGATION_FACTOR;
                }
                scores.push(score.clamp(-1.0, 1.0));
            }
            multiplier = 1.0;
            negated = false;
        }

        if scores.is_empty() {
            return Ok(0.0);
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        Ok(mean.clamp(-1.0, 1.0))
    }
}
