//! # pulsewatch-sentiment
//!
//! Rule-based text scoring for PulseWatch.
//!
//! - [`SentimentAnalyzer`] - lexicon sentiment score, confidence, and category
//! - [`trends`] - moving averages, anomalies, volatility over score series
//! - [`emotion`] - keyword emotion classification
//! - [`SentimentInsights`] - batch summary with recommendations
//! - [`ThreatScorer`] - risk scoring for threatening posts
//!
//! Everything here is pure; no call keeps state between inputs.

pub mod analyzer;
pub mod emotion;
pub mod insights;
pub mod lexicon;
pub mod threat;
pub mod trends;

pub use analyzer::{CategoryCounts, SentimentAnalyzer, SentimentCategory, SentimentResult};
pub use emotion::{Emotion, classify_emotion, dominant_emotion};
pub use insights::SentimentInsights;
pub use lexicon::Lexicon;
pub use threat::{FlaggedPost, PostSignal, ThreatAssessment, ThreatLevel, ThreatReport, ThreatScorer};
