//! PulseWatch - alert rules and sentiment scoring for social-media monitoring
//!
//! ## Usage
//!
//! ```bash
//! # Score one or more posts
//! pulsewatch analyze "I love this" "The checkout is broken"
//!
//! # Show the configured alert rules
//! pulsewatch rules
//!
//! # Run a short alert lifecycle against sample readings
//! pulsewatch demo
//!
//! # Print the effective configuration
//! pulsewatch --config ./pulsewatch.yaml config
//!
//! # With verbose logging to a custom directory
//! pulsewatch -v --log-dir /path/to/logs/ demo
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pulsewatch_alerts::{
    Alert, AlertManager, AlertStatistics, DEFAULT_HISTORY_LIMIT, Distribution, HistoryRow,
    Notification, Observation, ObservedMetric,
};
use pulsewatch_config::{PulseConfig, default_config_path};
use pulsewatch_core::{LogGuard, PulseError, Result, init_logging};
use pulsewatch_sentiment::{
    Emotion, PostSignal, SentimentAnalyzer, SentimentInsights, SentimentResult, ThreatAssessment,
    ThreatScorer, classify_emotion,
};
use serde::Serialize;
use tracing::{error, info};

/// PulseWatch monitoring core
///
/// Evaluates alert rules over social-media metrics and scores post text
/// for sentiment and threat signals.
#[derive(Parser, Debug)]
#[command(name = "pulsewatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.pulsewatch/logs/)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Configuration file (defaults to ~/.pulsewatch/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score texts for sentiment, emotion, and threat signals
    Analyze {
        /// Texts to score
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// List configured alert rules
    Rules,
    /// Run an alert lifecycle against sample readings
    Demo {
        /// Fill statistics with placeholder values (flagged simulated)
        #[arg(long)]
        simulate: bool,
    },
    /// Print the effective configuration as YAML
    Config,
}

#[derive(Serialize)]
struct TextReport {
    text: String,
    sentiment: SentimentResult,
    emotions: BTreeMap<Emotion, f64>,
    threat: ThreatAssessment,
}

#[derive(Serialize)]
struct AnalyzeOutput {
    results: Vec<TextReport>,
    insights: Option<SentimentInsights>,
}

#[derive(Serialize)]
struct DemoOutput {
    active_alerts: Vec<Alert>,
    statistics: AlertStatistics,
    type_distribution: Distribution,
    severity_distribution: Distribution,
    history: Vec<HistoryRow>,
    notifications: Vec<Notification>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    info!(command = ?cli.command, log_dir = %guard.log_dir().display(), "Starting PulseWatch");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("PulseWatch error: {}", e);
            eprintln!("Error: {}", e);
            if let Some(hint) = e.guidance() {
                eprintln!("\n{}", hint);
            }
            ExitCode::from(1)
        }
    }
}

/// Set up logging based on CLI arguments.
fn setup_logging(cli: &Cli) -> Result<LogGuard> {
    init_logging(cli.log_dir.clone(), cli.verbose > 0)
}

fn load_config(cli: &Cli) -> Result<PulseConfig> {
    match &cli.config {
        Some(path) => PulseConfig::load(path),
        None => PulseConfig::load_or_default(&default_config_path()?),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Command::Analyze { texts } => analyze(&config, texts),
        Command::Rules => {
            let manager = AlertManager::from_config(&config)?;
            print_json(&manager.rules())
        }
        Command::Demo { simulate } => demo(&config, *simulate),
        Command::Config => {
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

fn analyze(config: &PulseConfig, texts: &[String]) -> Result<()> {
    let analyzer = SentimentAnalyzer::from_config(&config.sentiment);
    let scorer = ThreatScorer::new();

    let reports: Vec<TextReport> = texts
        .iter()
        .map(|text| TextReport {
            text: text.clone(),
            sentiment: analyzer.analyze(text),
            emotions: classify_emotion(text),
            threat: scorer.assess(&PostSignal::new(text.as_str())),
        })
        .collect();

    let results: Vec<_> = reports.iter().map(|r| r.sentiment).collect();
    let insights = SentimentInsights::from_results(&results);

    print_json(&AnalyzeOutput {
        results: reports,
        insights,
    })
}

/// Drive a manager through raise, snooze, escalate, and resolve.
fn demo(config: &PulseConfig, simulate: bool) -> Result<()> {
    let mut manager = AlertManager::from_config(config)?.with_demo_mode(config.demo_mode || simulate);
    let mut rng = rand::rng();

    let readings = [
        Observation::new("Twitter", ObservedMetric::Mentions(450.0)),
        Observation::new("Instagram", ObservedMetric::Sentiment(-0.65)),
        Observation::new("Facebook", ObservedMetric::EngagementRate(0.015)),
        Observation::new("Twitter", ObservedMetric::Sentiment(0.4)),
    ];
    let mut raised = Vec::new();
    for reading in &readings {
        raised.extend(manager.evaluate(reading));
    }
    info!(raised = raised.len(), "sample readings evaluated");

    if let Some(first) = raised.first() {
        manager.escalate_alert(first)?;
    }
    if let Some(second) = raised.get(1) {
        let hours = manager.settings().default_snooze_hours;
        manager.snooze_alert(second, hours)?;
    }
    if let Some(last) = raised.get(2) {
        manager.resolve_alert(last)?;
    }

    let output = DemoOutput {
        statistics: manager.alert_statistics(&mut rng),
        type_distribution: manager.alert_type_distribution(&mut rng),
        severity_distribution: manager.alert_severity_distribution(&mut rng),
        history: manager.alert_history(DEFAULT_HISTORY_LIMIT),
        notifications: manager.take_notifications(),
        active_alerts: manager.active_alerts().into_iter().cloned().collect(),
    };
    print_json(&output)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| PulseError::internal(format!("serializing output: {e}")))?;
    println!("{out}");
    Ok(())
}
