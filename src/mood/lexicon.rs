use super::Mood;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Process-wide lexicon, built on first use and never mutated.
    pub static ref DEFAULT_LEXICON: MoodLexicon = MoodLexicon::standard();
}

/// Signals that vote for one mood.
#[derive(Debug)]
pub struct MoodSignals {
    /// English keywords, +2 when found in the text or the tags.
    pub primary_keywords: &'static [&'static str],
    /// Kannada keywords, +3 when found in the text.
    pub secondary_keywords: &'static [&'static str],
    /// Emoji and punctuation, +1 when found in the text.
    pub indicators: &'static [&'static str],
    /// Song-name fragments common in Kannada film music, +2 per match.
    pub patterns: Vec<Regex>,
}

#[derive(Debug)]
pub struct MoodLexicon {
    signals: [MoodSignals; 6],
}

const ENERGETIC_PRIMARY: &[&str] = &[
    "dance", "party", "workout", "energy", "upbeat", "festival", "electronic", "edm", "techno",
    "bass", "drop", "beat", "fast", "work out", "exercise", "gym", "running", "cardio", "club",
    "banger", "hype", "pump", "energetic", "powerful",
];
const ENERGETIC_SECONDARY: &[&str] = &["ನೃತ್ಯ", "ಡಾನ್ಸ್", "ಪಾರ್ಟಿ", "ಉತ್ಸವ", "ಆನಂದ", "ಚೈತನ್ಯ"];
const ENERGETIC_INDICATORS: &[&str] = &["!", "🔥", "💃", "🕺", "⭐", "🎉"];
const ENERGETIC_PATTERNS: &[&str] = &[
    "gana", "item", "party", "dance", "beat", "fast", "pump", "kola", "hook", "step", "remix",
    "masti", "josh", "dhamaal",
];

const HAPPY_PRIMARY: &[&str] = &[
    "happy", "joy", "sunshine", "smile", "good vibes", "positive", "celebrate", "celebration",
    "fun", "summer", "vacation", "holiday", "upbeat", "cheerful", "optimistic", "party", "enjoy",
    "wonderful", "fantastic", "amazing", "beautiful", "awesome",
];
const HAPPY_SECONDARY: &[&str] = &["ಸಂತೋಷ", "ಖುಷಿ", "ಹರ್ಷ", "ಆನಂದ", "ಮೋಡಿ", "ಸುಖ", "ಖುಶಿ", "ಆಹ್ಲಾದ"];
const HAPPY_INDICATORS: &[&str] = &["😊", "😂", "🎈", "🎊", "✨", "🌟"];
const HAPPY_PATTERNS: &[&str] = &[
    "ishte", "prema", "khushi", "santosha", "masti", "hasya", "fun", "comedy", "celebration",
    "utsava", "habba", "chanda",
];

const ROMANTIC_PRIMARY: &[&str] = &[
    "love", "romantic", "heart", "valentine", "kiss", "relationship", "couple", "date",
    "wedding", "anniversary", "slow", "ballad", "emotional", "feelings", "devotion", "affection",
    "together", "forever", "miss you", "my love", "darling", "sweetheart",
];
const ROMANTIC_SECONDARY: &[&str] = &[
    "ಪ್ರೇಮ", "ರೊಮ್ಯಾಂಟಿಕ್", "ಹೃದಯ", "ಕಿಸ್", "ನೆನಪು", "ಇಷ್ಟ", "ಅನುರಾಗ", "ಕಾಮುಕ",
];
const ROMANTIC_INDICATORS: &[&str] = &["❤️", "💕", "💖", "😍", "💘"];
const ROMANTIC_PATTERNS: &[&str] = &[
    "prema", "love", "kannu", "manasa", "hridaya", "mouna", "heyalu", "manada", "neene", "ninna",
    "priya", "sneha",
];

const CHILL_PRIMARY: &[&str] = &[
    "chill", "calm", "relax", "lofi", "study", "sleep", "peaceful", "ambient", "meditation",
    "yoga", "calming", "soothing", "quiet", "background", "focus", "concentrate", "reading",
    "mellow", "soft", "gentle", "easy", "light",
];
const CHILL_SECONDARY: &[&str] = &["ಶಾಂತ", "ರಿಲ್ಯಾಕ್ಸ್", "ಶಾಂತಿ", "ಸೌಮ್ಯ", "ಮೃದು"];
const CHILL_INDICATORS: &[&str] = &["🌙", "☁️", "🌿", "💤", "📚"];

const SAD_PRIMARY: &[&str] = &[
    "sad", "breakup", "heartbreak", "tears", "lonely", "miss you", "depression", "emotional",
    "cry", "pain", "lost", "goodbye", "melancholy", "blue", "hurt", "alone", "broken", "regret",
];
const SAD_SECONDARY: &[&str] = &["ದುಃಖ", "ವಿರಹ", "ಬೇಸರ", "ಕಣ್ಣೀರು", "ಏಕಾಂತ", "ನೋವು", "ವ್ಯಥೆ"];
const SAD_INDICATORS: &[&str] = &["😢", "💔", "☔", "🌧️", "🐦"];

// "achievement" appears twice and therefore scores twice.
const MOTIVATIONAL_PRIMARY: &[&str] = &[
    "motivation", "inspire", "strong", "fight", "winner", "success", "achievement", "goal",
    "dream", "power", "victory", "champion", "overcome", "determination", "perseverance",
    "ambition", "inspirational", "believe", "achievement", "glory",
];
const MOTIVATIONAL_SECONDARY: &[&str] = &["ಪ್ರೇರಣೆ", "ಸ್ಫೂರ್ತಿ", "ಶಕ್ತಿ", "ಜಯ", "ವಿಜಯ", "ಸಾಧನೆ", "ಲಕ್ಷ್ಯ"];
const MOTIVATIONAL_INDICATORS: &[&str] = &["💪", "🏆", "⭐", "🚀", "🔥"];

fn compile_patterns(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
        .collect()
}

impl MoodLexicon {
    /// The built-in English/Kannada tables.
    pub fn standard() -> Self {
        MoodLexicon {
            signals: [
                MoodSignals {
                    primary_keywords: ENERGETIC_PRIMARY,
                    secondary_keywords: ENERGETIC_SECONDARY,
                    indicators: ENERGETIC_INDICATORS,
                    patterns: compile_patterns(ENERGETIC_PATTERNS),
                },
                MoodSignals {
                    primary_keywords: HAPPY_PRIMARY,
                    secondary_keywords: HAPPY_SECONDARY,
                    indicators: HAPPY_INDICATORS,
                    patterns: compile_patterns(HAPPY_PATTERNS),
                },
                MoodSignals {
                    primary_keywords: ROMANTIC_PRIMARY,
                    secondary_keywords: ROMANTIC_SECONDARY,
                    indicators: ROMANTIC_INDICATORS,
                    patterns: compile_patterns(ROMANTIC_PATTERNS),
                },
                MoodSignals {
                    primary_keywords: CHILL_PRIMARY,
                    secondary_keywords: CHILL_SECONDARY,
                    indicators: CHILL_INDICATORS,
                    patterns: Vec::new(),
                },
                MoodSignals {
                    primary_keywords: SAD_PRIMARY,
                    secondary_keywords: SAD_SECONDARY,
                    indicators: SAD_INDICATORS,
                    patterns: Vec::new(),
                },
                MoodSignals {
                    primary_keywords: MOTIVATIONAL_PRIMARY,
                    secondary_keywords: MOTIVATIONAL_SECONDARY,
                    indicators: MOTIVATIONAL_INDICATORS,
                    patterns: Vec::new(),
                },
            ],
        }
    }

    pub fn signals(&self, mood: Mood) -> &MoodSignals {
        &self.signals[mood.index()]
    }

    /// Moods paired with their signals, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Mood, &MoodSignals)> {
        Mood::ALL.iter().map(move |mood| (*mood, self.signals(*mood)))
    }
}
