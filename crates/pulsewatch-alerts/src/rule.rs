//! Configured alert rules.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use pulsewatch_core::{NotificationChannel, RuleSpec, RuleType, Severity};
use serde::{Deserialize, Serialize};

/// Identifier generated by the [`AlertManager`](crate::AlertManager) when a rule is added.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub(crate) fn from_seq(seq: u64) -> Self {
        Self(format!("rule-{seq}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A rule alerts are generated against.
///
/// Owned by the manager; the only way to change one is through manager
/// methods (`enable_rule`, `disable_rule`, evaluation bumping `trigger_count`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub id: RuleId,
    pub name: String,
    pub rule_type: RuleType,
    pub platforms: BTreeSet<String>,
    pub threshold: f64,
    pub severity: Severity,
    pub notifications: BTreeSet<NotificationChannel>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub trigger_count: u64,
    pub keywords: Vec<String>,
}

impl AlertRule {
    /// Build a rule from an already validated spec.
    pub(crate) fn from_spec(id: RuleId, spec: RuleSpec, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: spec.name,
            rule_type: spec.rule_type,
            platforms: spec.platforms,
            threshold: spec.threshold,
            severity: spec.severity,
            notifications: spec.notifications,
            enabled: spec.enabled,
            created_at: now,
            trigger_count: 0,
            keywords: spec.keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Whether this rule watches `platform` (case-insensitive).
    pub fn targets(&self, platform: &str) -> bool {
        self.platforms.iter().any(|p| p.eq_ignore_ascii_case(platform))
    }

    /// Platform used for synthesized alerts: the first configured one.
    pub fn primary_platform(&self) -> &str {
        self.platforms
            .iter()
            .next()
            .map(String::as_str)
            .unwrap_or("Twitter")
    }

    /// Count keyword occurrences in `text` (case-insensitive substring matches).
    pub fn keyword_hits(&self, text: &str) -> usize {
        let text = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| !k.is_empty())
            .map(|k| text.matches(k.as_str()).count())
            .sum()
    }

    /// Convert back into the configuration-surface form.
    pub fn to_spec(&self) -> RuleSpec {
        RuleSpec {
            name: self.name.clone(),
            rule_type: self.rule_type,
            platforms: self.platforms.clone(),
            threshold: self.threshold,
            severity: self.severity,
            notifications: self.notifications.clone(),
            enabled: self.enabled,
            keywords: self.keywords.clone(),
        }
    }
}
