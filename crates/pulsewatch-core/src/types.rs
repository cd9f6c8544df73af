//! Shared type definitions used across PulseWatch crates.
//!
//! These types form the configuration surface for alert rules: the config
//! crate deserializes them from YAML and the alerts crate consumes them.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PulseError, Result};

/// Alert severity level, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, most urgent first.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Get the icon for this severity level.
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Low => "ℹ",
            Severity::Medium => "⚡",
            Severity::High => "⚠",
            Severity::Critical => "✖",
        }
    }

    /// Whether alerts of this severity should page someone (SMS, escalation).
    pub fn should_page(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(PulseError::invalid_input(
                "severity",
                format!("unknown severity '{other}'"),
            )),
        }
    }
}

/// The condition family an alert rule watches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleType {
    /// Mention volume above the threshold
    MentionSpike,
    /// Average sentiment below the threshold
    SentimentDrop,
    /// Engagement rate below the threshold
    EngagementDrop,
    /// Tracked keyword matches above the threshold
    Keyword,
    /// Caller-defined metric above the threshold
    Custom,
}

impl RuleType {
    /// Human-readable label, as shown in distributions.
    pub fn label(&self) -> &'static str {
        match self {
            RuleType::MentionSpike => "Mention Spike",
            RuleType::SentimentDrop => "Sentiment Drop",
            RuleType::EngagementDrop => "Engagement Drop",
            RuleType::Keyword => "Keyword Alert",
            RuleType::Custom => "Custom",
        }
    }

    /// The metric name a rule of this type is evaluated against.
    pub fn metric(&self) -> &'static str {
        match self {
            RuleType::MentionSpike => "Mentions",
            RuleType::SentimentDrop => "Sentiment",
            RuleType::EngagementDrop => "Engagement Rate",
            RuleType::Keyword => "Keyword Matches",
            RuleType::Custom => "Custom",
        }
    }

    /// Whether `value` breaches `threshold` for this rule type.
    ///
    /// Drop rules fire below the threshold, everything else above it.
    pub fn breached(&self, value: f64, threshold: f64) -> bool {
        match self {
            RuleType::SentimentDrop | RuleType::EngagementDrop => value < threshold,
            RuleType::MentionSpike | RuleType::Keyword | RuleType::Custom => value > threshold,
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A channel an alert notification can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NotificationChannel {
    Email,
    Slack,
    Sms,
    InApp,
    Webhook,
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotificationChannel::Email => "Email",
            NotificationChannel::Slack => "Slack",
            NotificationChannel::Sms => "SMS",
            NotificationChannel::InApp => "In-App",
            NotificationChannel::Webhook => "Webhook",
        };
        f.write_str(name)
    }
}

fn default_enabled() -> bool {
    true
}

/// An alert rule as it arrives from configuration, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub rule_type: RuleType,
    pub platforms: BTreeSet<String>,
    pub threshold: f64,
    pub severity: Severity,
    #[serde(default)]
    pub notifications: BTreeSet<NotificationChannel>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Terms matched by [`RuleType::Keyword`] rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl RuleSpec {
    /// Create an enabled rule spec with no notification channels.
    pub fn new(
        name: impl Into<String>,
        rule_type: RuleType,
        platforms: impl IntoIterator<Item = impl Into<String>>,
        threshold: f64,
        severity: Severity,
    ) -> Self {
        Self {
            name: name.into(),
            rule_type,
            platforms: platforms.into_iter().map(Into::into).collect(),
            threshold,
            severity,
            notifications: BTreeSet::new(),
            enabled: true,
            keywords: Vec::new(),
        }
    }

    pub fn with_notifications(
        mut self,
        channels: impl IntoIterator<Item = NotificationChannel>,
    ) -> Self {
        self.notifications.extend(channels);
        self
    }

    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords
            .extend(keywords.into_iter().map(|k| k.into().to_lowercase()));
        self
    }

    /// Reject specs the alert manager cannot evaluate.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PulseError::invalid_input("name", "rule name must not be empty"));
        }
        if !self.threshold.is_finite() {
            return Err(PulseError::invalid_input(
                "threshold",
                format!("threshold must be finite, got {}", self.threshold),
            ));
        }
        if self.platforms.is_empty() {
            return Err(PulseError::invalid_input(
                "platforms",
                format!("rule '{}' targets no platforms", self.name),
            ));
        }
        if self.rule_type == RuleType::Keyword && self.keywords.is_empty() {
            return Err(PulseError::invalid_input(
                "keywords",
                format!("keyword rule '{}' has no keywords", self.name),
            ));
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(PulseError::invalid_input(
                "keywords",
                format!("rule '{}' has a blank keyword", self.name),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Critical.should_page());
        assert!(!Severity::Medium.should_page());
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!(" High ".parse::<Severity>().unwrap(), Severity::High);
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_rule_type_breach_direction() {
        assert!(RuleType::MentionSpike.breached(150.0, 100.0));
        assert!(!RuleType::MentionSpike.breached(100.0, 100.0));
        assert!(RuleType::SentimentDrop.breached(-0.65, -0.5));
        assert!(!RuleType::SentimentDrop.breached(-0.2, -0.5));
        assert!(RuleType::EngagementDrop.breached(0.015, 0.02));
    }

    #[test]
    fn test_channel_display() {
        assert_eq!(NotificationChannel::Sms.to_string(), "SMS");
        assert_eq!(NotificationChannel::InApp.to_string(), "In-App");
    }

    #[test]
    fn test_rule_spec_validate() {
        let spec = RuleSpec::new("Spike", RuleType::MentionSpike, ["Twitter"], 100.0, Severity::High);
        assert!(spec.validate().is_ok());

        let mut unnamed = spec.clone();
        unnamed.name = "  ".into();
        assert!(unnamed.validate().is_err());

        let mut nan = spec.clone();
        nan.threshold = f64::NAN;
        assert!(nan.validate().is_err());

        let mut nowhere = spec.clone();
        nowhere.platforms.clear();
        assert!(nowhere.validate().is_err());

        let keyword = RuleSpec::new("Brand", RuleType::Keyword, ["Twitter"], 0.0, Severity::Low);
        assert!(keyword.validate().is_err());
        assert!(keyword.clone().with_keywords([""]).validate().is_err());
        assert!(keyword.clone().with_keywords(["Acme", "  "]).validate().is_err());
        assert!(keyword.with_keywords(["Acme"]).validate().is_ok());
    }

    #[test]
    fn test_rule_spec_serde_defaults() {
        let json = r#"{"name":"Spike","rule_type":"MentionSpike","platforms":["Twitter"],"threshold":100.0,"severity":"High"}"#;
        let spec: RuleSpec = serde_json::from_str(json).unwrap();
        assert!(spec.enabled);
        assert!(spec.notifications.is_empty());
        assert!(spec.keywords.is_empty());
    }
}
