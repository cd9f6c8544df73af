//! Lexicon-based sentiment scoring.
//!
//! Text is lowercased and cleaned (URLs removed, `@`/`#` prefixes dropped),
//! then split into word tokens. An apostrophe splits a word, so "don't" is
//! the two tokens `don` and `t` and negates nothing. Tokens are scanned left
//! to right:
//!
//! - an intensifier sets the multiplier for the next polar word
//! - a negation flips the sign of the next polar word
//! - a polar word adds ±1 times the pending modifiers, then resets them
//!
//! The sum is divided by the token count and clamped to [-1, 1].

use std::fmt;
use std::sync::LazyLock;

use pulsewatch_config::SentimentConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lexicon::{Lexicon, TokenRole};

static URL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"https?://\S+").ok());
static TAG_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[@#](\w+)").ok());
static SPACE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s+").ok());
static TOKEN_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\b\w+\b").ok());

/// Sentiment bucket of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentCategory {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentCategory::Positive => write!(f, "Positive"),
            SentimentCategory::Negative => write!(f, "Negative"),
            SentimentCategory::Neutral => write!(f, "Neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// In [-1, 1]
    pub score: f64,
    /// `|score|`, capped at 1
    pub confidence: f64,
    pub category: SentimentCategory,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            confidence: 0.0,
            category: SentimentCategory::Neutral,
        }
    }
}

/// Category counts over a batch of texts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl CategoryCounts {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    fn add(&mut self, category: SentimentCategory) {
        match category {
            SentimentCategory::Positive => self.positive += 1,
            SentimentCategory::Negative => self.negative += 1,
            SentimentCategory::Neutral => self.neutral += 1,
        }
    }
}

/// Stateless scorer; one instance can be shared freely.
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: Lexicon,
    positive_threshold: f64,
    negative_threshold: f64,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    /// Stock lexicon, category thresholds at ±0.2.
    pub fn new() -> Self {
        Self::from_config(&SentimentConfig::default())
    }

    pub fn from_config(config: &SentimentConfig) -> Self {
        Self {
            lexicon: Lexicon::default().with_extras(&config.extra_positive, &config.extra_negative),
            positive_threshold: config.positive_threshold,
            negative_threshold: config.negative_threshold,
        }
    }

    /// Score a single text.
    pub fn analyze(&self, text: &str) -> SentimentResult {
        if text.is_empty() {
            return SentimentResult::neutral();
        }

        let cleaned = clean_text(text);
        let tokens = tokenize(&cleaned);
        let score = self.score_tokens(&tokens);
        tracing::trace!(tokens = tokens.len(), score, "sentiment scored");

        SentimentResult {
            score,
            confidence: score.abs().min(1.0),
            category: self.categorize(score),
        }
    }

    pub fn categorize(&self, score: f64) -> SentimentCategory {
        if score > self.positive_threshold {
            SentimentCategory::Positive
        } else if score < self.negative_threshold {
            SentimentCategory::Negative
        } else {
            SentimentCategory::Neutral
        }
    }

    fn score_tokens(&self, tokens: &[&str]) -> f64 {
        if tokens.is_empty() {
            return 0.0;
        }

        let mut sum = 0.0;
        let mut multiplier = 1.0;
        let mut negated = false;

        for token in tokens {
            match self.lexicon.role(token) {
                TokenRole::Intensifier(m) => multiplier = m,
                TokenRole::Negation => negated = true,
                TokenRole::Polar(polarity) => {
                    let value = polarity * multiplier;
                    sum += if negated { -value } else { value };
                    multiplier = 1.0;
                    negated = false;
                }
                TokenRole::Plain => {}
            }
        }

        (sum / tokens.len() as f64).clamp(-1.0, 1.0)
    }

    pub fn analyze_batch<I>(&self, texts: I) -> Vec<SentimentResult>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        texts.into_iter().map(|t| self.analyze(t.as_ref())).collect()
    }

    pub fn distribution<I>(&self, texts: I) -> CategoryCounts
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut counts = CategoryCounts::default();
        for text in texts {
            counts.add(self.analyze(text.as_ref()).category);
        }
        counts
    }

    /// Mean score over `texts`, 0 for no input.
    pub fn average_score<I>(&self, texts: I) -> f64
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let scores: Vec<f64> = self.analyze_batch(texts).iter().map(|r| r.score).collect();
        if scores.is_empty() {
            return 0.0;
        }
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Lowercase and strip noise that carries no sentiment.
pub fn clean_text(text: &str) -> String {
    let mut text = text.to_lowercase();
    if let Some(re) = URL_PATTERN.as_ref() {
        text = re.replace_all(&text, "").into_owned();
    }
    if let Some(re) = TAG_PATTERN.as_ref() {
        text = re.replace_all(&text, "$1").into_owned();
    }
    match SPACE_PATTERN.as_ref() {
        Some(re) => re.replace_all(text.trim(), " ").into_owned(),
        None => text.split_whitespace().collect::<Vec<_>>().join(" "),
    }
}

/// Split cleaned text into word tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    match TOKEN_PATTERN.as_ref() {
        Some(re) => re.find_iter(text).map(|m| m.as_str()).collect(),
        None => text
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|t| !t.is_empty())
            .collect(),
    }
}
