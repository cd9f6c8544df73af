//! Alerts and their lifecycle transitions.
//!
//! ## Status graph
//!
//! ```text
//! Active ──snooze──▶ Snoozed ──expiry / reactivate──▶ Active
//!   │                  │
//!   └──resolve──▶ Resolved ◀──resolve──┘
//! ```
//!
//! Resolved is terminal. Every transition appends to the alert's timeline.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use pulsewatch_core::{PulseError, Result, RuleType, Severity};
use serde::{Deserialize, Serialize};

use crate::rule::{AlertRule, RuleId};

/// Identifier generated by the [`AlertManager`](crate::AlertManager) when an alert is raised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(String);

impl AlertId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub(crate) fn from_seq(seq: u64) -> Self {
        Self(format!("alert-{seq}"))
    }

    /// Sequence number of a manager-issued id (`alert-{n}`).
    pub(crate) fn seq(&self) -> Option<u64> {
        self.0.strip_prefix("alert-")?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlertId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Lifecycle status of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertStatus {
    Active,
    Snoozed,
    Resolved,
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertStatus::Active => write!(f, "Active"),
            AlertStatus::Snoozed => write!(f, "Snoozed"),
            AlertStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

/// One entry in an alert's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub timestamp: DateTime<Utc>,
    pub event: String,
}

/// A detected threshold breach requiring attention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    /// Rule that produced this alert. The rule may since have been deleted.
    pub rule_id: Option<RuleId>,
    pub rule_type: Option<RuleType>,
    pub title: String,
    pub description: String,
    pub platform: String,
    pub metric: String,
    pub current_value: f64,
    pub threshold: f64,
    pub severity: Severity,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub snoozed_until: Option<DateTime<Utc>>,
    pub escalated: bool,
    pub timeline: Vec<TimelineEvent>,
}

impl Alert {
    /// Create an active alert with an empty timeline.
    pub fn new(
        id: AlertId,
        title: impl Into<String>,
        platform: impl Into<String>,
        severity: Severity,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            rule_id: None,
            rule_type: None,
            title: title.into(),
            description: String::new(),
            platform: platform.into(),
            metric: String::new(),
            current_value: 0.0,
            threshold: 0.0,
            severity,
            status: AlertStatus::Active,
            created_at: now,
            resolved_at: None,
            snoozed_until: None,
            escalated: false,
            timeline: Vec::new(),
        }
    }

    /// Link this alert to the rule that produced it.
    pub fn with_rule(mut self, rule: &AlertRule) -> Self {
        self.rule_id = Some(rule.id.clone());
        self.rule_type = Some(rule.rule_type);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Record the metric reading that breached the threshold.
    pub fn with_measurement(mut self, metric: impl Into<String>, current_value: f64, threshold: f64) -> Self {
        self.metric = metric.into();
        self.current_value = current_value;
        self.threshold = threshold;
        self
    }

    /// Append a timeline entry.
    pub fn record(&mut self, now: DateTime<Utc>, event: impl Into<String>) {
        self.timeline.push(TimelineEvent {
            timestamp: now,
            event: event.into(),
        });
    }

    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }

    pub fn is_resolved(&self) -> bool {
        self.status == AlertStatus::Resolved
    }

    /// Snoozed and the snooze window has elapsed at `now`.
    pub fn snooze_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == AlertStatus::Snoozed && self.snoozed_until.is_some_and(|until| now > until)
    }

    /// Snooze for `hours`. A snoozed alert gets its window restarted.
    ///
    /// No-op on a resolved alert. Fails without changing the alert when the
    /// window would end past the last representable timestamp.
    pub fn snooze(&mut self, hours: u32, now: DateTime<Utc>) -> Result<()> {
        if self.is_resolved() {
            return Ok(());
        }
        let until = now
            .checked_add_signed(Duration::hours(i64::from(hours)))
            .ok_or_else(|| {
                PulseError::invalid_input("hours", format!("a {hours} hour snooze ends out of range"))
            })?;
        self.status = AlertStatus::Snoozed;
        self.snoozed_until = Some(until);
        self.record(now, format!("Alert snoozed for {hours} hour(s)"));
        Ok(())
    }

    /// Return a snoozed alert to Active.
    pub fn reactivate(&mut self, now: DateTime<Utc>) {
        if self.status != AlertStatus::Snoozed {
            return;
        }
        self.status = AlertStatus::Active;
        self.snoozed_until = None;
        self.record(now, "Alert reactivated");
    }

    /// Flag for escalation. Status is unchanged.
    pub fn escalate(&mut self, now: DateTime<Utc>) {
        self.escalated = true;
        self.record(now, "Alert escalated");
    }

    /// Resolve the alert. Resolution is terminal; repeated calls are no-ops.
    pub fn resolve(&mut self, now: DateTime<Utc>) {
        if self.is_resolved() {
            return;
        }
        self.status = AlertStatus::Resolved;
        self.resolved_at = Some(now);
        self.snoozed_until = None;
        self.record(now, "Alert resolved");
    }

    /// Minutes from creation to resolution, if resolved.
    pub fn response_minutes(&self) -> Option<f64> {
        self.resolved_at
            .map(|at| (at - self.created_at).num_seconds() as f64 / 60.0)
    }

    /// Format for display in one line.
    pub fn format_compact(&self) -> String {
        let escalated = if self.escalated { " ⇑" } else { "" };
        format!(
            "{} [{}] {} ({}){}",
            self.severity.icon(),
            self.platform,
            self.title,
            self.status,
            escalated
        )
    }

    /// Format for detailed display.
    pub fn format_detail(&self) -> String {
        let time = self.created_at.format("%H:%M:%S");
        let mut out = format!(
            "[{}] {} {} - {}\n  {}: {} (threshold {})",
            time,
            self.severity.icon(),
            self.platform,
            self.title,
            self.metric,
            self.current_value,
            self.threshold
        );
        if !self.description.is_empty() {
            out.push_str("\n  ");
            out.push_str(&self.description);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(now: DateTime<Utc>) -> Alert {
        Alert::new(AlertId::from_seq(1), "Mention Spike Detected", "Twitter", Severity::High, now)
            .with_measurement("Mentions", 450.0, 100.0)
    }

    #[test]
    fn test_new_alert_is_active() {
        let now = Utc::now();
        let alert = alert(now);
        assert_eq!(alert.id.as_str(), "alert-1");
        assert!(alert.is_active());
        assert!(!alert.escalated);
        assert!(alert.timeline.is_empty());
        assert_eq!(alert.created_at, now);
    }

    #[test]
    fn test_snooze_sets_window() {
        let now = Utc::now();
        let mut alert = alert(now);
        alert.snooze(2, now).unwrap();

        assert_eq!(alert.status, AlertStatus::Snoozed);
        assert_eq!(alert.snoozed_until, Some(now + Duration::hours(2)));
        assert_eq!(alert.timeline[0].event, "Alert snoozed for 2 hour(s)");
        assert!(!alert.snooze_expired(now + Duration::hours(2)));
        assert!(alert.snooze_expired(now + Duration::hours(2) + Duration::seconds(1)));
    }

    #[test]
    fn test_snooze_out_of_range_leaves_alert_unchanged() {
        let now = Utc::now();
        let mut alert = alert(now);
        let err = alert.snooze(u32::MAX, now).unwrap_err();

        assert!(matches!(err, PulseError::InvalidInput { .. }));
        assert!(alert.is_active());
        assert!(alert.snoozed_until.is_none());
        assert!(alert.timeline.is_empty());
    }

    #[test]
    fn test_reactivate_only_from_snoozed() {
        let now = Utc::now();
        let mut alert = alert(now);
        alert.reactivate(now);
        assert!(alert.timeline.is_empty());

        alert.snooze(1, now).unwrap();
        alert.reactivate(now);
        assert!(alert.is_active());
        assert!(alert.snoozed_until.is_none());
        assert_eq!(alert.timeline.last().unwrap().event, "Alert reactivated");
    }

    #[test]
    fn test_escalate_keeps_status() {
        let now = Utc::now();
        let mut alert = alert(now);
        alert.snooze(1, now).unwrap();
        alert.escalate(now);
        assert!(alert.escalated);
        assert_eq!(alert.status, AlertStatus::Snoozed);
    }

    #[test]
    fn test_resolve_is_terminal() {
        let now = Utc::now();
        let later = now + Duration::minutes(30);
        let mut alert = alert(now);
        alert.resolve(later);
        alert.resolve(later + Duration::minutes(5));
        alert.snooze(1, later).unwrap();

        assert!(alert.is_resolved());
        assert_eq!(alert.resolved_at, Some(later));
        assert_eq!(alert.timeline.len(), 1);
        assert_eq!(alert.response_minutes(), Some(30.0));
    }

    #[test]
    fn test_format_compact() {
        let alert = alert(Utc::now());
        let compact = alert.format_compact();
        assert!(compact.contains("⚠"));
        assert!(compact.contains("Twitter"));
        assert!(compact.contains("Active"));
    }

    #[test]
    fn test_format_detail() {
        let now = DateTime::parse_from_rfc3339("2026-03-04T09:15:30Z").unwrap().with_timezone(&Utc);
        let plain = alert(now);
        assert_eq!(
            plain.format_detail(),
            "[09:15:30] ⚠ Twitter - Mention Spike Detected\n  Mentions: 450 (threshold 100)"
        );

        let described = alert(now).with_description("Spike after launch post");
        assert!(described.format_detail().ends_with("\n  Spike after launch post"));
    }
}
