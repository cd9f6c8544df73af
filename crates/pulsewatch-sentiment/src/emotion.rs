//! Keyword-based emotion classification.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyzer::{clean_text, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Anger,
    Sadness,
    Fear,
    Surprise,
    Disgust,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Emotion::Joy,
        Emotion::Anger,
        Emotion::Sadness,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Emotion::Joy => &["happy", "joy", "excited", "thrilled", "delighted", "cheerful", "elated"],
            Emotion::Anger => &["angry", "mad", "furious", "rage", "irritated", "annoyed", "frustrated"],
            Emotion::Sadness => &["sad", "depressed", "disappointed", "upset", "down", "blue", "gloomy"],
            Emotion::Fear => &["afraid", "scared", "worried", "anxious", "nervous", "terrified", "concerned"],
            Emotion::Surprise => &["surprised", "shocked", "amazed", "astonished", "stunned", "unexpected"],
            Emotion::Disgust => &["disgusted", "disgusting", "revolting", "repulsive", "awful", "terrible"],
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Emotion::Joy => "joy",
            Emotion::Anger => "anger",
            Emotion::Sadness => "sadness",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
        };
        f.write_str(name)
    }
}

/// Score each emotion as the fraction of its keywords present in `text`.
///
/// A keyword is present when some token starts with it ("joy" in "joyful").
/// Every emotion appears in the result, most at 0.
pub fn classify_emotion(text: &str) -> BTreeMap<Emotion, f64> {
    let cleaned = clean_text(text);
    let tokens = tokenize(&cleaned);

    Emotion::ALL
        .iter()
        .map(|emotion| {
            let keywords = emotion.keywords();
            let present = keywords
                .iter()
                .filter(|k| tokens.iter().any(|t| t.starts_with(**k)))
                .count();
            (*emotion, present as f64 / keywords.len() as f64)
        })
        .collect()
}

/// The highest-scoring emotion, if any keyword matched.
pub fn dominant_emotion(scores: &BTreeMap<Emotion, f64>) -> Option<Emotion> {
    scores
        .iter()
        .filter(|(_, score)| **score > 0.0)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(emotion, _)| *emotion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_counts_distinct_keywords() {
        let scores = classify_emotion("So happy and excited, happy happy!");
        assert!((scores[&Emotion::Joy] - 2.0 / 7.0).abs() < 1e-9);
        assert_eq!(scores[&Emotion::Anger], 0.0);
        assert_eq!(scores.len(), 6);
    }

    #[test]
    fn test_match_never_starts_mid_word() {
        // "mad" ends "nomad" and "down" ends "lowdown"
        let scores = classify_emotion("the nomad gave us the lowdown");
        assert!(scores.values().all(|s| *s == 0.0));
        assert_eq!(dominant_emotion(&scores), None);
    }

    #[test]
    fn test_inflected_forms_match() {
        let scores = classify_emotion("A joyful crowd, everyone upsetting the odds");
        assert!((scores[&Emotion::Joy] - 1.0 / 7.0).abs() < 1e-9);
        assert!((scores[&Emotion::Sadness] - 1.0 / 7.0).abs() < 1e-9);
        assert_eq!(scores[&Emotion::Anger], 0.0);
    }

    #[test]
    fn test_dominant_emotion() {
        let scores = classify_emotion("Shocked and stunned, honestly a bit worried");
        assert_eq!(dominant_emotion(&scores), Some(Emotion::Surprise));
    }
}
