//! Alert manager: rule set, live alerts, and resolved history.
//!
//! The manager is a plain value constructed by the embedding application
//! and handed to whatever needs it. All operations are synchronous and
//! run to completion.
//!
//! Every time-dependent operation comes in two forms: `op(...)` uses the
//! current time, `op_at(..., now)` takes it explicitly.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use pulsewatch_config::{MonitoringConfig, PulseConfig};
use pulsewatch_core::logging::ALERT_TARGET;
use pulsewatch_core::{
    log_alert_event, log_rule_event, NotificationChannel, PulseError, Result, RuleSpec, RuleType,
};
use serde::{Deserialize, Serialize};

use crate::alert::{Alert, AlertId};
use crate::notify::Notification;
use crate::rule::{AlertRule, RuleId};

/// A metric reading fed into rule evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub platform: String,
    pub metric: ObservedMetric,
}

/// The measured quantity of an [`Observation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObservedMetric {
    /// Mention volume, checked by mention-spike rules
    Mentions(f64),
    /// Average sentiment score, checked by sentiment-drop rules
    Sentiment(f64),
    /// Engagement rate, checked by engagement-drop rules
    EngagementRate(f64),
    /// Free text, scanned by keyword rules
    Text(String),
    /// Named value, checked by custom rules
    Custom { name: String, value: f64 },
}

impl Observation {
    pub fn new(platform: impl Into<String>, metric: ObservedMetric) -> Self {
        Self {
            platform: platform.into(),
            metric,
        }
    }

    /// The reading as seen by `rule`: `(metric name, value)`, or `None` when
    /// the rule does not watch this kind of metric.
    fn reading_for(&self, rule: &AlertRule) -> Option<(String, f64)> {
        match (&self.metric, rule.rule_type) {
            (ObservedMetric::Mentions(v), RuleType::MentionSpike)
            | (ObservedMetric::Sentiment(v), RuleType::SentimentDrop)
            | (ObservedMetric::EngagementRate(v), RuleType::EngagementDrop) => {
                Some((rule.rule_type.metric().to_string(), *v))
            }
            (ObservedMetric::Text(text), RuleType::Keyword) => {
                let hits = rule.keyword_hits(text);
                (hits > 0).then(|| (rule.rule_type.metric().to_string(), hits as f64))
            }
            (ObservedMetric::Custom { name, value }, RuleType::Custom) => {
                Some((name.clone(), *value))
            }
            _ => None,
        }
    }
}

/// Holds configured rules and live alerts, and exposes their lifecycle.
#[derive(Debug, Clone)]
pub struct AlertManager {
    rules: Vec<AlertRule>,
    /// Active and Snoozed alerts, in creation order
    alerts: Vec<Alert>,
    /// Resolved alerts, oldest first
    history: VecDeque<Alert>,
    outbox: Vec<Notification>,
    next_rule_id: u64,
    next_alert_id: u64,
    pub(crate) settings: MonitoringConfig,
    pub(crate) demo_mode: bool,
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertManager {
    /// Create an empty manager with default settings and demo mode off.
    pub fn new() -> Self {
        Self::with_settings(MonitoringConfig::default())
    }

    pub fn with_settings(settings: MonitoringConfig) -> Self {
        Self {
            rules: Vec::new(),
            alerts: Vec::new(),
            history: VecDeque::new(),
            outbox: Vec::new(),
            next_rule_id: 1,
            next_alert_id: 1,
            settings,
            demo_mode: false,
        }
    }

    /// Build a manager from configuration, loading every configured rule.
    pub fn from_config(config: &PulseConfig) -> Result<Self> {
        let mut manager = Self::with_settings(config.monitoring.clone()).with_demo_mode(config.demo_mode);
        let now = Utc::now();
        for spec in &config.rules {
            manager.add_rule_at(spec.clone(), now)?;
        }
        Ok(manager)
    }

    /// Enable or disable placeholder statistics.
    pub fn with_demo_mode(mut self, demo_mode: bool) -> Self {
        self.demo_mode = demo_mode;
        self
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    pub fn settings(&self) -> &MonitoringConfig {
        &self.settings
    }

    // =========================================================================
    // Rules
    // =========================================================================

    /// Validate and append a rule. Returns the generated id.
    pub fn add_rule(&mut self, spec: RuleSpec) -> Result<RuleId> {
        self.add_rule_at(spec, Utc::now())
    }

    pub fn add_rule_at(&mut self, spec: RuleSpec, now: DateTime<Utc>) -> Result<RuleId> {
        spec.validate()?;
        let id = RuleId::from_seq(self.next_rule_id);
        self.next_rule_id += 1;

        let rule = AlertRule::from_spec(id.clone(), spec, now);
        log_rule_event!(id, "added");
        self.rules.push(rule);
        Ok(id)
    }

    /// All configured rules, in insertion order.
    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    pub fn rule(&self, id: &RuleId) -> Option<&AlertRule> {
        self.rules.iter().find(|r| &r.id == id)
    }

    fn rule_mut(&mut self, id: &RuleId) -> Result<&mut AlertRule> {
        self.rules
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| PulseError::rule_not_found(id))
    }

    pub fn enable_rule(&mut self, id: &RuleId) -> Result<()> {
        self.rule_mut(id)?.enabled = true;
        log_rule_event!(id, "enabled");
        Ok(())
    }

    pub fn disable_rule(&mut self, id: &RuleId) -> Result<()> {
        self.rule_mut(id)?.enabled = false;
        log_rule_event!(id, "disabled");
        Ok(())
    }

    /// Remove a rule. Alerts it produced stay where they are.
    pub fn delete_rule(&mut self, id: &RuleId) -> Result<()> {
        let before = self.rules.len();
        self.rules.retain(|r| &r.id != id);
        if self.rules.len() == before {
            return Err(PulseError::rule_not_found(id));
        }
        log_rule_event!(id, "deleted");
        Ok(())
    }

    /// Raise a synthetic alert from a rule's configuration so the
    /// notification path can be checked by hand.
    pub fn test_rule(&mut self, id: &RuleId) -> Result<AlertId> {
        self.test_rule_at(id, Utc::now())
    }

    pub fn test_rule_at(&mut self, id: &RuleId, now: DateTime<Utc>) -> Result<AlertId> {
        let rule = self.rule(id).ok_or_else(|| PulseError::rule_not_found(id))?;
        let alert_id = AlertId::from_seq(self.next_alert_id);

        let mut alert = Alert::new(
            alert_id.clone(),
            format!("Test Alert - {}", rule.name),
            rule.primary_platform(),
            rule.severity,
            now,
        )
        .with_rule(rule)
        .with_description("This is a test alert generated manually.")
        .with_measurement("Test Metric", rule.threshold + 10.0, rule.threshold);
        alert.record(now, "Test alert triggered manually");

        self.next_alert_id += 1;
        log_alert_event!(alert_id, "test_raised", rule_id = %id);
        self.push_live(alert);
        Ok(alert_id)
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Check an observation against every enabled rule targeting its platform.
    ///
    /// A breach raises a new alert unless the same rule already has an
    /// unresolved alert on that platform, in which case that alert's value is
    /// refreshed instead. Returns the ids of newly raised alerts.
    pub fn evaluate(&mut self, observation: &Observation) -> Vec<AlertId> {
        self.evaluate_at(observation, Utc::now())
    }

    pub fn evaluate_at(&mut self, observation: &Observation, now: DateTime<Utc>) -> Vec<AlertId> {
        let mut raised = Vec::new();

        for idx in 0..self.rules.len() {
            let rule = &self.rules[idx];
            if !rule.enabled || !rule.targets(&observation.platform) {
                continue;
            }
            let Some((metric, value)) = observation.reading_for(rule) else {
                continue;
            };
            if !rule.rule_type.breached(value, rule.threshold) {
                continue;
            }

            let rule_id = rule.id.clone();
            self.rules[idx].trigger_count += 1;

            let existing = self.alerts.iter_mut().find(|a| {
                a.rule_id.as_ref() == Some(&rule_id)
                    && a.platform.eq_ignore_ascii_case(&observation.platform)
            });
            if let Some(alert) = existing {
                alert.current_value = value;
                alert.record(now, format!("Threshold breached again ({metric} = {value})"));
                log_alert_event!(alert.id, "rebreached", value);
                continue;
            }

            let rule = &self.rules[idx];
            let alert_id = AlertId::from_seq(self.next_alert_id);
            self.next_alert_id += 1;

            let mut alert = Alert::new(
                alert_id.clone(),
                format!("{} Detected", rule.rule_type.label()),
                observation.platform.clone(),
                rule.severity,
                now,
            )
            .with_rule(rule)
            .with_description(format!(
                "{} on {} is {} against threshold {} ({})",
                metric, observation.platform, value, rule.threshold, rule.name
            ))
            .with_measurement(metric, value, rule.threshold);
            alert.record(now, "Alert triggered");

            let channels: Vec<NotificationChannel> = rule.notifications.iter().copied().collect();
            for channel in channels {
                self.outbox
                    .push(Notification::for_alert(&alert, channel, false, now));
                alert.record(now, format!("Notification queued via {channel}"));
            }

            log_alert_event!(alert_id, "raised", rule_id = %rule_id, severity = %alert.severity);
            self.push_live(alert);
            raised.push(alert_id);
        }

        raised
    }

    fn push_live(&mut self, alert: Alert) {
        self.alerts.push(alert);
        if self.alerts.len() > self.settings.max_alerts {
            tracing::warn!(
                target: ALERT_TARGET,
                live = self.alerts.len(),
                max = self.settings.max_alerts,
                "live alert backlog exceeds configured maximum"
            );
        }
    }

    // =========================================================================
    // Alert queries
    // =========================================================================

    /// Active alerts, including snoozed ones whose window has passed.
    ///
    /// Expired snoozes are reactivated as a side effect.
    pub fn active_alerts(&mut self) -> Vec<&Alert> {
        self.active_alerts_at(Utc::now())
    }

    pub fn active_alerts_at(&mut self, now: DateTime<Utc>) -> Vec<&Alert> {
        self.reactivate_expired(now);
        self.alerts.iter().filter(|a| a.is_active()).collect()
    }

    /// Reactivate every snoozed alert whose window has passed. Returns how many.
    pub fn reactivate_expired(&mut self, now: DateTime<Utc>) -> usize {
        let mut count = 0;
        for alert in self.alerts.iter_mut().filter(|a| a.snooze_expired(now)) {
            alert.reactivate(now);
            log_alert_event!(alert.id, "snooze_expired");
            count += 1;
        }
        count
    }

    /// Every unresolved alert regardless of status.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Resolved alerts, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Alert> {
        self.history.iter()
    }

    /// Look up an alert among live and resolved alerts.
    pub fn alert(&self, id: &AlertId) -> Option<&Alert> {
        self.alerts
            .iter()
            .find(|a| &a.id == id)
            .or_else(|| self.history.iter().find(|a| &a.id == id))
    }

    /// All alerts, live then resolved.
    pub(crate) fn all_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().chain(self.history.iter())
    }

    fn live_mut(&mut self, id: &AlertId) -> Result<&mut Alert> {
        if let Some(pos) = self.alerts.iter().position(|a| &a.id == id) {
            return Ok(&mut self.alerts[pos]);
        }
        if self.resolved_earlier(id) {
            return Err(PulseError::invalid_input(
                "alert",
                format!("{id} is already resolved"),
            ));
        }
        Err(PulseError::alert_not_found(id))
    }

    /// True for an id that is not live but was resolved, whether or not it
    /// is still retained in history.
    ///
    /// Alerts only leave the live list through resolution, so any id this
    /// manager issued that is no longer live has been resolved.
    fn resolved_earlier(&self, id: &AlertId) -> bool {
        self.history.iter().any(|a| &a.id == id)
            || id.seq().is_some_and(|seq| (1..self.next_alert_id).contains(&seq))
    }

    // =========================================================================
    // Alert lifecycle
    // =========================================================================

    /// Resolve an alert and move it to history.
    ///
    /// Resolving an alert that was already resolved succeeds without
    /// changing anything, including once it has been pruned from history.
    pub fn resolve_alert(&mut self, id: &AlertId) -> Result<()> {
        self.resolve_alert_at(id, Utc::now())
    }

    pub fn resolve_alert_at(&mut self, id: &AlertId, now: DateTime<Utc>) -> Result<()> {
        let Some(pos) = self.alerts.iter().position(|a| &a.id == id) else {
            if self.resolved_earlier(id) {
                return Ok(());
            }
            return Err(PulseError::alert_not_found(id));
        };

        let mut alert = self.alerts.remove(pos);
        alert.resolve(now);
        log_alert_event!(alert.id, "resolved");
        self.history.push_back(alert);

        while self.history.len() > self.settings.max_history {
            if let Some(dropped) = self.history.pop_front() {
                tracing::debug!(target: ALERT_TARGET, alert_id = %dropped.id, "pruned from history");
            }
        }
        Ok(())
    }

    /// Snooze an alert for `hours` (must be at least 1).
    pub fn snooze_alert(&mut self, id: &AlertId, hours: u32) -> Result<()> {
        self.snooze_alert_at(id, hours, Utc::now())
    }

    pub fn snooze_alert_at(&mut self, id: &AlertId, hours: u32, now: DateTime<Utc>) -> Result<()> {
        if hours == 0 {
            return Err(PulseError::invalid_input("hours", "snooze must be at least one hour"));
        }
        let alert = self.live_mut(id)?;
        alert.snooze(hours, now)?;
        log_alert_event!(id, "snoozed", hours);
        Ok(())
    }

    /// Return a snoozed alert to Active before its window ends.
    pub fn reactivate_alert(&mut self, id: &AlertId) -> Result<()> {
        self.reactivate_alert_at(id, Utc::now())
    }

    pub fn reactivate_alert_at(&mut self, id: &AlertId, now: DateTime<Utc>) -> Result<()> {
        let alert = self.live_mut(id)?;
        alert.reactivate(now);
        log_alert_event!(id, "reactivated");
        Ok(())
    }

    /// Flag an alert as escalated and notify every channel of its rule.
    ///
    /// Alerts whose rule no longer exists notify in-app only.
    pub fn escalate_alert(&mut self, id: &AlertId) -> Result<()> {
        self.escalate_alert_at(id, Utc::now())
    }

    pub fn escalate_alert_at(&mut self, id: &AlertId, now: DateTime<Utc>) -> Result<()> {
        let channels: Vec<NotificationChannel> = {
            let alert = self.live_mut(id)?;
            let rule_id = alert.rule_id.clone();
            rule_id
                .as_ref()
                .and_then(|rid| self.rule(rid))
                .map(|rule| rule.notifications.iter().copied().collect::<Vec<_>>())
                .filter(|channels| !channels.is_empty())
                .unwrap_or_else(|| vec![NotificationChannel::InApp])
        };

        let alert = self.live_mut(id)?;
        alert.escalate(now);
        let alert: &Alert = alert;
        let notes: Vec<Notification> = channels
            .into_iter()
            .map(|channel| Notification::for_alert(alert, channel, true, now))
            .collect();
        self.outbox.extend(notes);
        log_alert_event!(id, "escalated");
        Ok(())
    }

    /// Snooze every Active alert for the configured silence period.
    /// Returns the number of alerts silenced.
    pub fn silence_all(&mut self) -> usize {
        self.silence_all_at(Utc::now())
    }

    pub fn silence_all_at(&mut self, now: DateTime<Utc>) -> usize {
        let hours = self.settings.silence_hours;
        let mut count = 0;
        for alert in self.alerts.iter_mut().filter(|a| a.is_active()) {
            if let Err(e) = alert.snooze(hours, now) {
                tracing::warn!(target: ALERT_TARGET, error = %e, "silence window out of range");
                break;
            }
            count += 1;
        }
        tracing::info!(target: ALERT_TARGET, count, hours, "silenced all active alerts");
        count
    }

    /// Drain queued notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending_notifications(&self) -> &[Notification] {
        &self.outbox
    }
}
