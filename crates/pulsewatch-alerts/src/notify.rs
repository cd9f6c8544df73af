//! Notification outbox records.
//!
//! The manager does not deliver anything itself. It queues one
//! [`Notification`] per channel of the triggering rule, and the embedding
//! application drains them with
//! [`AlertManager::take_notifications`](crate::AlertManager::take_notifications).

use chrono::{DateTime, Utc};
use pulsewatch_core::{NotificationChannel, Severity};
use serde::{Deserialize, Serialize};

use crate::alert::{Alert, AlertId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub alert_id: AlertId,
    pub channel: NotificationChannel,
    pub severity: Severity,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// Raised by an escalation rather than the initial trigger
    pub escalation: bool,
}

impl Notification {
    pub fn for_alert(
        alert: &Alert,
        channel: NotificationChannel,
        escalation: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let prefix = if escalation { "[ESCALATED] " } else { "" };
        let subject = format!(
            "{}[{}] {} on {}",
            prefix, alert.severity, alert.title, alert.platform
        );
        let body = if alert.metric.is_empty() {
            alert.description.clone()
        } else {
            format!(
                "{}: {} (threshold {}). {}",
                alert.metric, alert.current_value, alert.threshold, alert.description
            )
            .trim_end()
            .to_string()
        };

        Self {
            alert_id: alert.id.clone(),
            channel,
            severity: alert.severity,
            subject,
            body,
            created_at: now,
            escalation,
        }
    }

    /// High and Critical notifications need immediate delivery.
    pub fn is_urgent(&self) -> bool {
        self.escalation || self.severity.should_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_subject_and_body() {
        let now = Utc::now();
        let alert = Alert::new(AlertId::new("alert-9"), "Sentiment Drop Detected", "Instagram", Severity::Critical, now)
            .with_measurement("Sentiment", -0.65, -0.5)
            .with_description("Immediate attention required.");

        let note = Notification::for_alert(&alert, NotificationChannel::Sms, false, now);
        assert_eq!(note.subject, "[Critical] Sentiment Drop Detected on Instagram");
        assert!(note.body.starts_with("Sentiment: -0.65 (threshold -0.5)."));
        assert!(note.is_urgent());

        let escalated = Notification::for_alert(&alert, NotificationChannel::Email, true, now);
        assert!(escalated.subject.starts_with("[ESCALATED] "));
    }

    #[test]
    fn test_low_severity_not_urgent() {
        let now = Utc::now();
        let alert = Alert::new(AlertId::new("alert-1"), "Minor", "Twitter", Severity::Low, now);
        let note = Notification::for_alert(&alert, NotificationChannel::InApp, false, now);
        assert!(!note.is_urgent());
        assert!(note.body.is_empty());
    }
}
