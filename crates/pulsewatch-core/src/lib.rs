//! # pulsewatch-core
//!
//! Core types, errors, and utilities for the PulseWatch monitoring core.
//!
//! This crate provides:
//! - [`PulseError`] - Error types for all PulseWatch operations
//! - [`logging`] - Tracing setup and alert event macros
//! - [`types`] - Rule and severity types shared by the config and alerts crates

pub mod error;
pub mod logging;
pub mod types;

// Re-export main types for convenience
pub use error::{PulseError, Result};
pub use logging::{LogGuard, init_logging};
pub use types::{NotificationChannel, RuleSpec, RuleType, Severity};
