//! # pulsewatch-config
//!
//! YAML configuration for PulseWatch.
//!
//! The configuration file lives at `~/.pulsewatch/config.yaml` by default.
//! Every section has defaults, so an empty file (or no file at all) yields
//! a working setup with the three stock alert rules.
//!
//! ```yaml
//! demo_mode: true
//! monitoring:
//!   silence_hours: 2
//! rules:
//!   - name: Brand keyword watch
//!     rule_type: Keyword
//!     platforms: [Twitter, Reddit]
//!     threshold: 0
//!     severity: Medium
//!     notifications: [Slack]
//!     keywords: [acme]
//! ```

use std::path::{Path, PathBuf};

use pulsewatch_core::{NotificationChannel, PulseError, Result, RuleSpec, RuleType, Severity};
use serde::{Deserialize, Serialize};

/// Top-level PulseWatch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Alert retention and snooze settings
    pub monitoring: MonitoringConfig,

    /// Fill statistics with random placeholder values when no real data
    /// exists. Anything produced this way is flagged as simulated.
    pub demo_mode: bool,

    /// Alert rules loaded into the manager at startup
    pub rules: Vec<RuleSpec>,

    /// Sentiment scorer tuning
    pub sentiment: SentimentConfig,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            monitoring: MonitoringConfig::default(),
            demo_mode: false,
            rules: default_rules(),
            sentiment: SentimentConfig::default(),
        }
    }
}

/// Alert retention and snooze settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Live alerts above which the manager logs a backlog warning
    pub max_alerts: usize,

    /// Resolved alerts kept in history before the oldest are dropped
    pub max_history: usize,

    /// Snooze length used when a caller does not pick one
    pub default_snooze_hours: u32,

    /// Snooze length applied by "silence all"
    pub silence_hours: u32,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            max_alerts: 100,
            max_history: 1000,
            default_snooze_hours: 1,
            silence_hours: 1,
        }
    }
}

/// Sentiment scorer tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Scores strictly above this are Positive
    pub positive_threshold: f64,

    /// Scores strictly below this are Negative
    pub negative_threshold: f64,

    /// Additional words scored +1
    pub extra_positive: Vec<String>,

    /// Additional words scored -1
    pub extra_negative: Vec<String>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            positive_threshold: 0.2,
            negative_threshold: -0.2,
            extra_positive: Vec::new(),
            extra_negative: Vec::new(),
        }
    }
}

/// The rules every fresh installation starts with.
pub fn default_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new(
            "High Mention Volume",
            RuleType::MentionSpike,
            ["Twitter", "Facebook"],
            100.0,
            Severity::High,
        )
        .with_notifications([NotificationChannel::Email, NotificationChannel::InApp]),
        RuleSpec::new(
            "Negative Sentiment Alert",
            RuleType::SentimentDrop,
            ["Twitter", "Instagram"],
            -0.5,
            Severity::Critical,
        )
        .with_notifications([
            NotificationChannel::Email,
            NotificationChannel::Slack,
            NotificationChannel::Sms,
        ]),
        RuleSpec::new(
            "Low Engagement Warning",
            RuleType::EngagementDrop,
            ["Facebook", "LinkedIn"],
            0.02,
            Severity::Medium,
        )
        .with_notifications([NotificationChannel::InApp]),
    ]
}

impl PulseConfig {
    /// Parse and validate configuration from a YAML string.
    ///
    /// `origin` is only used to label errors.
    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| PulseError::ConfigInvalid {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PulseError::config_not_found_with_source(path, e)
            } else {
                PulseError::io("reading config", path, e)
            }
        })?;
        let config = Self::from_yaml_str(&content, path)?;
        tracing::debug!(path = %path.display(), rules = config.rules.len(), "configuration loaded");
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(PulseError::ConfigNotFound { .. }) => {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Serialize this configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| PulseError::internal(format!("serializing config: {e}")))
    }

    /// Save configuration to a YAML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_yaml()?;
        std::fs::write(path, content).map_err(|e| PulseError::io("writing config", path, e))
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let s = &self.sentiment;
        if !s.positive_threshold.is_finite() || !s.negative_threshold.is_finite() {
            return Err(PulseError::ConfigValidation {
                message: "sentiment thresholds must be finite".into(),
            });
        }
        if s.positive_threshold <= s.negative_threshold {
            return Err(PulseError::ConfigValidation {
                message: format!(
                    "sentiment.positive_threshold ({}) must exceed negative_threshold ({})",
                    s.positive_threshold, s.negative_threshold
                ),
            });
        }

        let m = &self.monitoring;
        if m.default_snooze_hours == 0 || m.silence_hours == 0 {
            return Err(PulseError::ConfigValidation {
                message: "snooze and silence hours must be greater than zero".into(),
            });
        }
        if m.max_history == 0 {
            return Err(PulseError::ConfigValidation {
                message: "monitoring.max_history must keep at least one resolved alert".into(),
            });
        }

        for (i, rule) in self.rules.iter().enumerate() {
            rule.validate().map_err(|e| PulseError::ConfigValidation {
                message: format!("rules[{i}]: {e}"),
            })?;
        }

        Ok(())
    }
}

/// Get the default configuration file path.
///
/// Returns `~/.pulsewatch/config.yaml`
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PulseError::internal("could not determine home directory"))?;
    Ok(home.join(".pulsewatch").join("config.yaml"))
}
