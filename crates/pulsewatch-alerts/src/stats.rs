//! Alert statistics and distributions for dashboard display.
//!
//! Figures are computed from the manager's live alerts and history. Some
//! dashboard figures (day-over-day changes, for instance) have no source in
//! an in-memory manager. When the manager runs in demo mode, those and any
//! distribution with no data behind it are filled with random placeholder
//! values and flagged `simulated`. Outside demo mode they are simply absent.
//!
//! Placeholder output is for demonstrations only and must never be read as
//! a real metric.

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike, Utc};
use pulsewatch_core::{PulseError, Result, Severity};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::alert::Alert;
use crate::manager::AlertManager;

/// Default number of rows returned by [`AlertManager::alert_history`].
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Number of placeholder response-time samples produced in demo mode.
const DEMO_RESPONSE_SAMPLES: usize = 50;

/// Headline alert figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertStatistics {
    /// Active alerts, after reactivating expired snoozes
    pub active_alerts: usize,
    /// Active alerts with Critical severity
    pub critical_alerts: usize,
    /// Live plus resolved alerts
    pub total_alerts: usize,
    /// Alerts raised since midnight UTC
    pub new_alerts_today: usize,
    /// Resolved / total, 0 when there are no alerts
    pub resolution_rate: f64,
    /// Mean minutes from creation to resolution
    pub avg_response_minutes: Option<f64>,
    pub critical_change: Option<i64>,
    pub response_time_change: Option<f64>,
    pub resolution_change: Option<f64>,
    /// At least one figure above is a random placeholder
    pub simulated: bool,
}

/// Alert counts keyed by a label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub counts: BTreeMap<String, usize>,
    /// Counts are random placeholders, not observed data
    pub simulated: bool,
}

impl Distribution {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn get(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }
}

/// One row of the alert history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub alert_id: String,
    pub title: String,
    pub platform: String,
    pub severity: Severity,
    pub status: String,
    pub triggered: String,
    pub resolved: String,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl From<&Alert> for HistoryRow {
    fn from(alert: &Alert) -> Self {
        Self {
            alert_id: alert.id.to_string(),
            title: alert.title.clone(),
            platform: alert.platform.clone(),
            severity: alert.severity,
            status: alert.status.to_string(),
            triggered: alert.created_at.format(TIMESTAMP_FORMAT).to_string(),
            resolved: alert
                .resolved_at
                .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

impl AlertManager {
    /// Whether any alert, live or resolved, exists.
    pub fn has_data(&self) -> bool {
        self.all_alerts().next().is_some()
    }

    /// Headline statistics.
    pub fn alert_statistics<R: Rng>(&mut self, rng: &mut R) -> AlertStatistics {
        self.alert_statistics_at(Utc::now(), rng)
    }

    pub fn alert_statistics_at<R: Rng>(&mut self, now: DateTime<Utc>, rng: &mut R) -> AlertStatistics {
        let active_alerts = self.active_alerts_at(now).len();
        let critical_alerts = self
            .alerts()
            .iter()
            .filter(|a| a.is_active() && a.severity == Severity::Critical)
            .count();

        let total_alerts = self.all_alerts().count();
        let resolved = self.history().count();
        let resolution_rate = if total_alerts > 0 {
            resolved as f64 / total_alerts as f64
        } else {
            0.0
        };

        let today = now.date_naive();
        let new_alerts_today = self
            .all_alerts()
            .filter(|a| a.created_at.date_naive() == today)
            .count();

        let mut simulated = false;
        let samples: Vec<f64> = self.history().filter_map(Alert::response_minutes).collect();
        let avg_response_minutes = if !samples.is_empty() {
            Some(samples.iter().sum::<f64>() / samples.len() as f64)
        } else if self.demo_mode {
            simulated = true;
            Some(rng.random_range(5.0..30.0))
        } else {
            None
        };

        let (critical_change, response_time_change, resolution_change) = if self.demo_mode {
            simulated = true;
            (
                Some(rng.random_range(-2..=5)),
                Some(rng.random_range(-5.0..5.0)),
                Some(rng.random_range(-0.1..0.1)),
            )
        } else {
            (None, None, None)
        };

        AlertStatistics {
            active_alerts,
            critical_alerts,
            total_alerts,
            new_alerts_today,
            resolution_rate,
            avg_response_minutes,
            critical_change,
            response_time_change,
            resolution_change,
            simulated,
        }
    }

    /// Alerts per rule type over live and resolved alerts.
    ///
    /// Alerts not produced by a rule count as "Unknown".
    pub fn alert_type_distribution<R: Rng>(&self, rng: &mut R) -> Distribution {
        let mut counts = BTreeMap::new();
        for alert in self.all_alerts() {
            let label = alert.rule_type.map(|t| t.label()).unwrap_or("Unknown");
            *counts.entry(label.to_string()).or_insert(0) += 1;
        }

        if counts.is_empty() && self.demo_mode {
            return Distribution {
                counts: BTreeMap::from([
                    ("Mention Spike".to_string(), rng.random_range(5..=20)),
                    ("Sentiment Drop".to_string(), rng.random_range(3..=15)),
                    ("Engagement Drop".to_string(), rng.random_range(2..=10)),
                    ("Keyword Alert".to_string(), rng.random_range(1..=8)),
                ]),
                simulated: true,
            };
        }

        Distribution {
            counts,
            simulated: false,
        }
    }

    /// Alerts per severity over live and resolved alerts.
    pub fn alert_severity_distribution<R: Rng>(&self, rng: &mut R) -> Distribution {
        let mut counts = BTreeMap::new();
        for alert in self.all_alerts() {
            *counts.entry(alert.severity.to_string()).or_insert(0) += 1;
        }

        if counts.is_empty() && self.demo_mode {
            let ranges = [(1, 5), (3, 10), (5, 15), (2, 8)];
            let counts = Severity::ALL
                .iter()
                .zip(ranges)
                .map(|(severity, (lo, hi))| (severity.to_string(), rng.random_range(lo..=hi)))
                .collect();
            return Distribution {
                counts,
                simulated: true,
            };
        }

        Distribution {
            counts,
            simulated: false,
        }
    }

    /// Live and resolved alerts, newest first, at most `limit` rows.
    pub fn alert_history(&self, limit: usize) -> Vec<HistoryRow> {
        let mut all: Vec<&Alert> = self.all_alerts().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.into_iter().take(limit).map(HistoryRow::from).collect()
    }

    /// Alerts raised during `hour` (0-23, UTC).
    ///
    /// With no alerts at all and demo mode on, returns a placeholder shaped
    /// like business-hours traffic.
    pub fn alerts_by_hour<R: Rng>(&self, hour: u32, rng: &mut R) -> Result<usize> {
        if hour > 23 {
            return Err(PulseError::invalid_input("hour", format!("{hour} is not in 0-23")));
        }
        if !self.has_data() && self.demo_mode {
            let count = if (9..=17).contains(&hour) {
                rng.random_range(5..=15)
            } else {
                rng.random_range(0..=5)
            };
            return Ok(count);
        }
        Ok(self
            .all_alerts()
            .filter(|a| a.created_at.hour() == hour)
            .count())
    }

    /// Minutes from creation to resolution for each resolved alert.
    ///
    /// With an empty history and demo mode on, returns placeholder samples.
    pub fn response_time_samples<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        let samples: Vec<f64> = self.history().filter_map(Alert::response_minutes).collect();
        if samples.is_empty() && self.demo_mode {
            return (0..DEMO_RESPONSE_SAMPLES)
                .map(|_| rng.random_range(1.0..60.0))
                .collect();
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pulsewatch_core::{RuleSpec, RuleType};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn critical_spec() -> RuleSpec {
        RuleSpec::new("Negative Sentiment Alert", RuleType::SentimentDrop, ["Instagram"], -0.5, Severity::Critical)
    }

    #[test]
    fn test_empty_statistics_without_demo() {
        let mut manager = AlertManager::new();
        let stats = manager.alert_statistics(&mut rng());
        assert_eq!(stats.active_alerts, 0);
        assert_eq!(stats.resolution_rate, 0.0);
        assert!(stats.avg_response_minutes.is_none());
        assert!(stats.critical_change.is_none());
        assert!(!stats.simulated);
    }

    #[test]
    fn test_demo_statistics_are_flagged() {
        let mut manager = AlertManager::new().with_demo_mode(true);
        let stats = manager.alert_statistics(&mut rng());
        assert!(stats.simulated);
        let avg = stats.avg_response_minutes.unwrap();
        assert!((5.0..30.0).contains(&avg));
        let change = stats.critical_change.unwrap();
        assert!((-2..=5).contains(&change));
    }

    #[test]
    fn test_statistics_from_real_alerts() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let mut manager = AlertManager::new();
        let rule = manager.add_rule_at(critical_spec(), now).unwrap();
        let a = manager.test_rule_at(&rule, now).unwrap();
        let b = manager.test_rule_at(&rule, now).unwrap();
        manager.test_rule_at(&rule, now).unwrap();
        manager.snooze_alert_at(&b, 1, now).unwrap();
        manager.resolve_alert_at(&a, now + Duration::minutes(20)).unwrap();

        let stats = manager.alert_statistics_at(now, &mut rng());
        assert_eq!(stats.active_alerts, 1);
        assert_eq!(stats.critical_alerts, 1);
        assert_eq!(stats.total_alerts, 3);
        assert_eq!(stats.new_alerts_today, 3);
        assert!((stats.resolution_rate - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.avg_response_minutes, Some(20.0));
        assert!(!stats.simulated);
    }

    #[test]
    fn test_type_distribution_counts_rule_types() {
        let now = Utc::now();
        let mut manager = AlertManager::new().with_demo_mode(true);
        let rule = manager.add_rule_at(critical_spec(), now).unwrap();
        manager.test_rule_at(&rule, now).unwrap();
        let id = manager.test_rule_at(&rule, now).unwrap();
        manager.resolve_alert_at(&id, now).unwrap();

        let dist = manager.alert_type_distribution(&mut rng());
        assert!(!dist.simulated);
        assert_eq!(dist.get("Sentiment Drop"), 2);
        assert_eq!(dist.total(), 2);
    }

    #[test]
    fn test_empty_distributions() {
        let manager = AlertManager::new();
        assert!(manager.alert_type_distribution(&mut rng()).counts.is_empty());
        assert!(manager.alert_severity_distribution(&mut rng()).counts.is_empty());

        let demo = AlertManager::new().with_demo_mode(true);
        let types = demo.alert_type_distribution(&mut rng());
        assert!(types.simulated);
        assert_eq!(types.counts.len(), 4);
        assert!((5..=20).contains(&types.get("Mention Spike")));

        let severities = demo.alert_severity_distribution(&mut rng());
        assert!(severities.simulated);
        assert!((1..=5).contains(&severities.get("Critical")));
        assert!((2..=8).contains(&severities.get("Low")));
    }

    #[test]
    fn test_severity_distribution_real() {
        let now = Utc::now();
        let mut manager = AlertManager::new();
        let rule = manager.add_rule_at(critical_spec(), now).unwrap();
        manager.test_rule_at(&rule, now).unwrap();

        let dist = manager.alert_severity_distribution(&mut rng());
        assert_eq!(dist.get("Critical"), 1);
        assert_eq!(dist.get("Low"), 0);
    }

    #[test]
    fn test_alert_history_newest_first() {
        let base = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
        let mut manager = AlertManager::new();
        let rule = manager.add_rule_at(critical_spec(), base).unwrap();
        let old = manager.test_rule_at(&rule, base).unwrap();
        let new = manager.test_rule_at(&rule, base + Duration::hours(2)).unwrap();
        manager.resolve_alert_at(&old, base + Duration::hours(1)).unwrap();

        let rows = manager.alert_history(DEFAULT_HISTORY_LIMIT);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].alert_id, new.to_string());
        assert_eq!(rows[0].resolved, "N/A");
        assert_eq!(rows[1].status, "Resolved");
        assert_eq!(rows[1].triggered, "2026-03-10 08:00:00");
        assert_eq!(rows[1].resolved, "2026-03-10 09:00:00");

        assert_eq!(manager.alert_history(1).len(), 1);
    }

    #[test]
    fn test_alerts_by_hour() {
        let at_ten = Utc.with_ymd_and_hms(2026, 3, 10, 10, 15, 0).unwrap();
        let mut manager = AlertManager::new();
        let rule = manager.add_rule_at(critical_spec(), at_ten).unwrap();
        manager.test_rule_at(&rule, at_ten).unwrap();

        assert_eq!(manager.alerts_by_hour(10, &mut rng()).unwrap(), 1);
        assert_eq!(manager.alerts_by_hour(3, &mut rng()).unwrap(), 0);
        assert!(manager.alerts_by_hour(24, &mut rng()).is_err());

        let demo = AlertManager::new().with_demo_mode(true);
        let busy = demo.alerts_by_hour(12, &mut rng()).unwrap();
        assert!((5..=15).contains(&busy));
        let quiet = demo.alerts_by_hour(2, &mut rng()).unwrap();
        assert!(quiet <= 5);
    }

    #[test]
    fn test_response_time_samples() {
        let manager = AlertManager::new();
        assert!(manager.response_time_samples(&mut rng()).is_empty());

        let demo = AlertManager::new().with_demo_mode(true);
        let samples = demo.response_time_samples(&mut rng());
        assert_eq!(samples.len(), DEMO_RESPONSE_SAMPLES);
        assert!(samples.iter().all(|s| (1.0..60.0).contains(s)));
    }
}
