//! File-based configuration loading tests.

use pulsewatch_config::PulseConfig;
use pulsewatch_core::{NotificationChannel, PulseError, RuleType};
use tempfile::tempdir;

const CUSTOM_CONFIG: &str = r#"
demo_mode: true
monitoring:
  max_history: 50
rules:
  - name: Brand keyword watch
    rule_type: Keyword
    platforms: [Twitter, Reddit]
    threshold: 0
    severity: Medium
    notifications: [Slack, Webhook]
    keywords: [acme]
  - name: Quiet rule
    rule_type: Custom
    platforms: [Twitter]
    threshold: 5
    severity: Low
    enabled: false
sentiment:
  extra_negative: [scam]
"#;

#[test]
fn test_load_custom_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, CUSTOM_CONFIG).unwrap();

    let config = PulseConfig::load(&path).unwrap();
    assert!(config.demo_mode);
    assert_eq!(config.monitoring.max_history, 50);
    assert_eq!(config.rules.len(), 2);

    let keyword = &config.rules[0];
    assert_eq!(keyword.rule_type, RuleType::Keyword);
    assert_eq!(keyword.keywords, vec!["acme".to_string()]);
    assert!(keyword.notifications.contains(&NotificationChannel::Webhook));

    assert!(!config.rules[1].enabled);
    assert_eq!(config.sentiment.extra_negative, vec!["scam".to_string()]);
}

#[test]
fn test_missing_file_is_config_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let err = PulseConfig::load(&path).unwrap_err();
    assert!(matches!(err, PulseError::ConfigNotFound { .. }));

    let config = PulseConfig::load_or_default(&path).unwrap();
    assert_eq!(config, PulseConfig::default());
}

#[test]
fn test_save_then_load_preserves_rules() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let mut config = PulseConfig::default();
    config.demo_mode = true;
    config.save(&path).unwrap();

    let loaded = PulseConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_or_default_surfaces_invalid_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "monitoring: [not, a, map]").unwrap();

    let err = PulseConfig::load_or_default(&path).unwrap_err();
    assert!(err.is_config_error());
}
