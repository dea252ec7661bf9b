//! Configuration schema definitions.
//!
//! Everything an operator may set from a file. Listeners and managed
//! resources are code, not configuration; they are attached through
//! [`Options`](crate::config::Options).

use serde::{Deserialize, Serialize};

use crate::lifecycle::signals::Signal;

/// Root settings for a lifecycle orchestrator.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Signal watching.
    pub signals: SignalConfig,

    /// Log output.
    pub logging: LoggingConfig,
}

/// Which OS signals trigger shutdown.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SignalConfig {
    /// Signal kinds to watch (e.g. `["SIGINT", "SIGTERM"]`). Empty adds
    /// nothing to what the caller already configured.
    pub watch: Vec<Signal>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g. `info`, `dominoes=debug,warn`).
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}
