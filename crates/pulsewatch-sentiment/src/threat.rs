//! Risk scoring for posts that may describe threats or unrest.
//!
//! | Signal                                        | Points |
//! |-----------------------------------------------|--------|
//! | each threat keyword present                   | +2     |
//! | each urgency word present                     | +1     |
//! | post has a location, or mentions a place word | +1     |
//! | engagement over 100 with any threat keyword   | +2     |
//!
//! Scores of 3 and up are Medium risk, 5 and up High.
//!
//! A word is present when some token starts with it, so "terror" catches
//! "terrorism" and "bomb" catches "bombing". Matches never start mid-word.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyzer::{clean_text, tokenize};

pub const THREAT_KEYWORDS: &[&str] = &[
    "bomb", "attack", "terror", "kill", "weapon", "explosive", "violence", "threat", "harm",
    "protest", "riot", "demonstration",
];

pub const URGENCY_WORDS: &[&str] = &["now", "today", "tonight", "urgent", "asap", "immediately"];

pub const LOCATION_WORDS: &[&str] = &["address", "location", "place", "building"];

/// Engagement above which threatening content scores extra.
pub const ENGAGEMENT_THRESHOLD: u64 = 100;

const MEDIUM_RISK: u32 = 3;
const HIGH_RISK: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    None,
    Medium,
    High,
}

impl ThreatLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_RISK {
            ThreatLevel::High
        } else if score >= MEDIUM_RISK {
            ThreatLevel::Medium
        } else {
            ThreatLevel::None
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreatLevel::None => write!(f, "none"),
            ThreatLevel::Medium => write!(f, "medium"),
            ThreatLevel::High => write!(f, "high"),
        }
    }
}

/// The parts of a post the scorer looks at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostSignal {
    pub text: String,
    /// Total interactions (likes, shares, replies)
    pub engagement: u64,
    /// The post carries a geotag or explicit location
    pub has_location: bool,
}

impl PostSignal {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_engagement(mut self, engagement: u64) -> Self {
        self.engagement = engagement;
        self
    }

    pub fn with_location(mut self) -> Self {
        self.has_location = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    pub risk_score: u32,
    pub level: ThreatLevel,
    /// Threat keywords found, in keyword-list order
    pub detected_keywords: Vec<String>,
}

impl ThreatAssessment {
    pub fn is_high_risk(&self) -> bool {
        self.level != ThreatLevel::None
    }
}

/// A post from a batch that scored Medium or higher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedPost {
    /// Position of the post in the input batch
    pub index: usize,
    pub assessment: ThreatAssessment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatReport {
    pub total_posts_analyzed: usize,
    pub threats_detected: bool,
    pub high_risk_posts: Vec<FlaggedPost>,
    /// Union of keywords over the flagged posts
    pub threat_keywords: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct ThreatScorer {
    threat_keywords: Vec<String>,
    urgency_words: Vec<String>,
    location_words: Vec<String>,
}

impl Default for ThreatScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreatScorer {
    pub fn new() -> Self {
        let owned = |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            threat_keywords: owned(THREAT_KEYWORDS),
            urgency_words: owned(URGENCY_WORDS),
            location_words: owned(LOCATION_WORDS),
        }
    }

    /// Track additional threat keywords. Duplicates are ignored.
    pub fn with_threat_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for keyword in keywords {
            let keyword = keyword.into().to_lowercase();
            if !self.threat_keywords.contains(&keyword) {
                self.threat_keywords.push(keyword);
            }
        }
        self
    }

    pub fn assess(&self, post: &PostSignal) -> ThreatAssessment {
        let cleaned = clean_text(&post.text);
        let tokens = tokenize(&cleaned);
        let present = |word: &String| tokens.iter().any(|t| t.starts_with(word.as_str()));

        let detected_keywords: Vec<String> = self
            .threat_keywords
            .iter()
            .filter(|w| present(w))
            .cloned()
            .collect();

        let mut risk_score = 2 * detected_keywords.len() as u32;
        risk_score += self.urgency_words.iter().filter(|w| present(w)).count() as u32;
        if post.has_location || self.location_words.iter().any(present) {
            risk_score += 1;
        }
        if post.engagement > ENGAGEMENT_THRESHOLD && !detected_keywords.is_empty() {
            risk_score += 2;
        }

        ThreatAssessment {
            risk_score,
            level: ThreatLevel::from_score(risk_score),
            detected_keywords,
        }
    }

    /// Assess every post and collect the ones at Medium risk or above.
    pub fn assess_batch(&self, posts: &[PostSignal]) -> ThreatReport {
        let high_risk_posts: Vec<FlaggedPost> = posts
            .iter()
            .enumerate()
            .map(|(index, post)| FlaggedPost {
                index,
                assessment: self.assess(post),
            })
            .filter(|flagged| flagged.assessment.is_high_risk())
            .collect();

        let threat_keywords: BTreeSet<String> = high_risk_posts
            .iter()
            .flat_map(|f| f.assessment.detected_keywords.iter().cloned())
            .collect();

        if !high_risk_posts.is_empty() {
            tracing::warn!(
                flagged = high_risk_posts.len(),
                total = posts.len(),
                "high-risk posts detected"
            );
        }

        ThreatReport {
            total_posts_analyzed: posts.len(),
            threats_detected: !high_risk_posts.is_empty(),
            high_risk_posts,
            threat_keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benign_post() {
        let assessment = ThreatScorer::new().assess(&PostSignal::new("Loving the new update"));
        assert_eq!(assessment.risk_score, 0);
        assert_eq!(assessment.level, ThreatLevel::None);
        assert!(assessment.detected_keywords.is_empty());
    }

    #[test]
    fn test_keyword_and_urgency_scoring() {
        let post = PostSignal::new("Protest at the building tonight, come now");
        let assessment = ThreatScorer::new().assess(&post);
        // protest 2 + tonight 1 + now 1 + building 1
        assert_eq!(assessment.risk_score, 5);
        assert_eq!(assessment.level, ThreatLevel::High);
        assert_eq!(assessment.detected_keywords, vec!["protest".to_string()]);
    }

    #[test]
    fn test_engagement_bonus_needs_keyword() {
        let scorer = ThreatScorer::new();
        let viral = PostSignal::new("riot").with_engagement(250);
        assert_eq!(scorer.assess(&viral).risk_score, 4);
        assert_eq!(scorer.assess(&viral).level, ThreatLevel::Medium);

        let harmless = PostSignal::new("great launch today").with_engagement(5000).with_location();
        assert_eq!(scorer.assess(&harmless).risk_score, 2);
    }

    #[test]
    fn test_match_never_starts_mid_word() {
        // "skill" and "knowledge" contain "kill" and "now"
        let assessment = ThreatScorer::new().assess(&PostSignal::new("skill and knowledge"));
        assert_eq!(assessment.risk_score, 0);
    }

    #[test]
    fn test_inflected_forms_match() {
        let scorer = ThreatScorer::new();

        let assessment = scorer.assess(&PostSignal::new("Terrorism attack planned"));
        assert_eq!(assessment.detected_keywords, vec!["attack".to_string(), "terror".to_string()]);
        assert_eq!(assessment.risk_score, 4);
        assert_eq!(assessment.level, ThreatLevel::Medium);

        let assessment = scorer.assess(&PostSignal::new("reports of a bombing downtown"));
        assert_eq!(assessment.detected_keywords, vec!["bomb".to_string()]);

        let assessment = scorer.assess(&PostSignal::new("They attacked the convoy"));
        assert_eq!(assessment.detected_keywords, vec!["attack".to_string()]);
    }

    #[test]
    fn test_custom_keywords() {
        let scorer = ThreatScorer::new().with_threat_keywords(["Sabotage", "bomb"]);
        let assessment = scorer.assess(&PostSignal::new("sabotage planned").with_location());
        assert_eq!(assessment.risk_score, 3);
        assert_eq!(assessment.detected_keywords, vec!["sabotage".to_string()]);
    }

    #[test]
    fn test_assess_batch() {
        let posts = vec![
            PostSignal::new("nice weather"),
            PostSignal::new("attack planned today").with_location(),
            PostSignal::new("riot and violence").with_engagement(101),
        ];
        let report = ThreatScorer::new().assess_batch(&posts);

        assert_eq!(report.total_posts_analyzed, 3);
        assert!(report.threats_detected);
        let indices: Vec<usize> = report.high_risk_posts.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(report.high_risk_posts[1].assessment.risk_score, 6);
        let keywords: Vec<&str> = report.threat_keywords.iter().map(String::as_str).collect();
        assert_eq!(keywords, vec!["attack", "riot", "violence"]);
    }

    #[test]
    fn test_empty_batch() {
        let report = ThreatScorer::new().assess_batch(&[]);
        assert!(!report.threats_detected);
        assert_eq!(report.total_posts_analyzed, 0);
    }
}
