//! Word lists used by the sentiment analyzer.

use std::collections::{HashMap, HashSet};

pub const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "excellent", "fantastic", "great", "love", "perfect", "wonderful",
    "outstanding", "brilliant", "superb", "incredible", "magnificent", "spectacular", "marvelous",
    "exceptional", "phenomenal", "terrific", "fabulous", "delightful", "impressive", "remarkable",
    "splendid", "beautiful", "gorgeous", "lovely", "charming", "pleasant", "enjoyable",
    "satisfied", "happy", "pleased", "thrilled", "excited", "grateful", "thankful", "appreciate",
    "recommend",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "terrible", "awful", "horrible", "bad", "worst", "hate", "disgusting", "disappointing",
    "frustrating", "annoying", "useless", "pathetic", "ridiculous", "absurd", "outrageous",
    "unacceptable", "inadequate", "inferior", "defective", "broken", "failed", "failure",
    "problem", "issue", "bug", "error", "glitch", "slow", "expensive", "overpriced", "cheap",
    "poor", "low-quality", "mediocre", "disappointed", "frustrated", "angry", "upset", "confused",
    "concerned", "worried", "skeptical", "doubtful", "suspicious", "complain", "complaint",
];

/// Intensifiers and the multiplier they apply to the next polar word.
pub const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("extremely", 2.0),
    ("incredibly", 2.0),
    ("absolutely", 1.8),
    ("totally", 1.5),
    ("completely", 1.7),
    ("really", 1.3),
    ("quite", 1.2),
    ("somewhat", 0.8),
    ("rather", 0.9),
    ("fairly", 0.9),
    ("slightly", 0.7),
    ("super", 1.6),
    ("ultra", 1.8),
    ("mega", 1.7),
];

/// Negation tokens. Contractions only match when written without the apostrophe.
pub const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "nowhere", "neither", "nobody", "cannot", "cant",
    "couldnt", "wont", "shouldnt", "dont", "doesnt", "didnt", "isnt", "wasnt", "arent", "werent",
];

/// Lookup tables built from the word lists plus any configured extras.
#[derive(Debug, Clone)]
pub struct Lexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
    intensifiers: HashMap<String, f64>,
    negations: HashSet<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            positive: POSITIVE_WORDS.iter().map(|w| w.to_string()).collect(),
            negative: NEGATIVE_WORDS.iter().map(|w| w.to_string()).collect(),
            intensifiers: INTENSIFIERS.iter().map(|(w, m)| (w.to_string(), *m)).collect(),
            negations: NEGATIONS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// How a single token affects the running score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenRole {
    Intensifier(f64),
    Negation,
    Polar(f64),
    Plain,
}

impl Lexicon {
    /// Extend the stock lists. Words are lowercased; a word added to both
    /// polarities counts as positive.
    pub fn with_extras<P, N>(mut self, positive: P, negative: N) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        self.positive
            .extend(positive.into_iter().map(|w| w.as_ref().to_lowercase()));
        self.negative
            .extend(negative.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    /// Classify one lowercased token. Modifiers take precedence over polarity.
    pub fn role(&self, token: &str) -> TokenRole {
        if let Some(multiplier) = self.intensifiers.get(token) {
            TokenRole::Intensifier(*multiplier)
        } else if self.negations.contains(token) {
            TokenRole::Negation
        } else if self.positive.contains(token) {
            TokenRole::Polar(1.0)
        } else if self.negative.contains(token) {
            TokenRole::Polar(-1.0)
        } else {
            TokenRole::Plain
        }
    }

    pub fn positive_len(&self) -> usize {
        self.positive.len()
    }

    pub fn negative_len(&self) -> usize {
        self.negative.len()
    }
}
