//! Alert rules and alert lifecycle for PulseWatch.
//!
//! [`AlertManager`] owns the rule set, the live alerts, and the resolved
//! history. Observations are checked against enabled rules with
//! [`AlertManager::evaluate`]; breaches raise alerts and queue
//! [`Notification`]s for the embedding application to deliver.
//!
//! ## Lifecycle
//!
//! - Raised alerts start Active
//! - Snoozed alerts return to Active once their window passes
//! - Escalation flags an alert and re-notifies, status unchanged
//! - Resolved alerts move to history, pruned to `max_history`

pub mod alert;
pub mod manager;
pub mod notify;
pub mod rule;
pub mod stats;

pub use alert::{Alert, AlertId, AlertStatus, TimelineEvent};
pub use manager::{AlertManager, Observation, ObservedMetric};
pub use notify::Notification;
pub use rule::{AlertRule, RuleId};
pub use stats::{AlertStatistics, DEFAULT_HISTORY_LIMIT, Distribution, HistoryRow};
