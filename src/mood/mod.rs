//! Rule-based mood tagging for song metadata.
//!
//! The classifier combines the static [`MoodLexicon`] tables, a text
//! polarity score and a small table of title rules into one score per
//! [`Mood`], and picks a single winner (or [`MoodLabel::Unknown`]).

mod classifier;
mod lexicon;
mod sentiment;
mod title_rules;

pub use classifier::{MoodClassifier, ScoreVector, CONFIDENCE_FLOOR};
pub use lexicon::{MoodLexicon, MoodSignals, DEFAULT_LEXICON};
pub use sentiment::{LexiconPolarity, PolarityScorer};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The closed set of mood labels.
///
/// Declaration order matters: it is the iteration order of every score table
/// and ties between equal scores go to the earliest variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mood {
    Energetic,
    Happy,
    Romantic,
    Chill,
    Sad,
    Motivational,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Energetic,
        Mood::Happy,
        Mood::Romantic,
        Mood::Chill,
        Mood::Sad,
        Mood::Motivational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Energetic => "energetic",
            Mood::Happy => "happy",
            Mood::Romantic => "romantic",
            Mood::Chill => "chill",
            Mood::Sad => "sad",
            Mood::Motivational => "motivational",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .iter()
            .copied()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown mood '{}'", s))
    }
}

/// Outcome of a classification: one of the moods, or `unknown` when no mood
/// gathered enough evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoodLabel {
    Known(Mood),
    Unknown,
}

impl MoodLabel {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Known(mood) => mood.as_str(),
            MoodLabel::Unknown => Self::UNKNOWN,
        }
    }

    pub fn mood(&self) -> Option<Mood> {
        match self {
            MoodLabel::Known(mood) => Some(*mood),
            MoodLabel::Unknown => None,
        }
    }
}

impl From<Mood> for MoodLabel {
    fn from(mood: Mood) -> Self {
        MoodLabel::Known(mood)
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(Self::UNKNOWN) {
            return Ok(MoodLabel::Unknown);
        }
        Mood::from_str(s).map(MoodLabel::Known)
    }
}

impl Serialize for MoodLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MoodLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MoodLabel::from_str(&raw).map_err(serde::de::Error::custom)
    }
}
