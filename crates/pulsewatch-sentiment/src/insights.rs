//! Summary figures and recommendations over a batch of sentiment results.

use serde::{Deserialize, Serialize};

use crate::analyzer::{SentimentCategory, SentimentResult};
use crate::trends::volatility;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentInsights {
    pub total_analyzed: usize,
    pub average_score: f64,
    pub score_range: f64,
    pub positive_ratio: f64,
    pub negative_ratio: f64,
    pub neutral_ratio: f64,
    pub most_positive: f64,
    pub most_negative: f64,
    pub volatility: f64,
    pub recommendations: Vec<String>,
}

impl SentimentInsights {
    /// Summarize `results`. Returns `None` for an empty batch.
    pub fn from_results(results: &[SentimentResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let total = results.len() as f64;
        let scores: Vec<f64> = results.iter().map(|r| r.score).collect();
        let ratio = |category: SentimentCategory| {
            results.iter().filter(|r| r.category == category).count() as f64 / total
        };

        let most_positive = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let most_negative = scores.iter().copied().fold(f64::INFINITY, f64::min);

        let mut insights = Self {
            total_analyzed: results.len(),
            average_score: scores.iter().sum::<f64>() / total,
            score_range: most_positive - most_negative,
            positive_ratio: ratio(SentimentCategory::Positive),
            negative_ratio: ratio(SentimentCategory::Negative),
            neutral_ratio: ratio(SentimentCategory::Neutral),
            most_positive,
            most_negative,
            volatility: volatility(&scores),
            recommendations: Vec::new(),
        };
        insights.recommendations = insights.recommend();
        Some(insights)
    }

    fn recommend(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.negative_ratio > 0.3 {
            out.push("High negative sentiment detected. Consider addressing customer concerns.");
        }
        if self.volatility > 0.5 {
            out.push("High sentiment volatility. Monitor for potential issues or opportunities.");
        }
        if self.positive_ratio > 0.7 {
            out.push("Strong positive sentiment. Consider amplifying successful strategies.");
        }
        if self.average_score < -0.2 {
            out.push("Overall negative sentiment. Immediate attention recommended.");
        }
        if out.is_empty() {
            out.push("Sentiment levels appear stable. Continue monitoring.");
        }
        out.into_iter().map(String::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SentimentAnalyzer;

    #[test]
    fn test_empty_batch() {
        assert!(SentimentInsights::from_results(&[]).is_none());
    }

    #[test]
    fn test_stable_batch() {
        let analyzer = SentimentAnalyzer::new();
        let results = analyzer.analyze_batch(["The sky is blue", "I love this", "Shipping today"]);
        let insights = SentimentInsights::from_results(&results).unwrap();

        assert_eq!(insights.total_analyzed, 3);
        assert!((insights.positive_ratio - 1.0 / 3.0).abs() < 1e-9);
        assert!((insights.neutral_ratio - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(insights.most_negative, 0.0);
        assert_eq!(
            insights.recommendations,
            vec!["Sentiment levels appear stable. Continue monitoring.".to_string()]
        );
    }

    #[test]
    fn test_negative_batch_recommendations() {
        let analyzer = SentimentAnalyzer::new();
        let results = analyzer.analyze_batch(["Terrible", "Awful service", "so bad", "fine"]);
        let insights = SentimentInsights::from_results(&results).unwrap();

        assert!(insights.negative_ratio > 0.3);
        assert!(insights.average_score < -0.2);
        assert!(insights.recommendations.iter().any(|r| r.starts_with("High negative")));
        assert!(insights.recommendations.iter().any(|r| r.starts_with("Overall negative")));
        assert_eq!(insights.score_range, 1.0);
    }
}
