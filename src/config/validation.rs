//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject duplicate or platform-unsupported signal kinds
//! - Reject log filters `tracing-subscriber` cannot parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Settings → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use tracing_subscriber::EnvFilter;

use crate::config::schema::Settings;
use crate::lifecycle::signals::Signal;

/// A single semantic problem in [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("signal {0} is listed more than once")]
    DuplicateSignal(Signal),

    #[error("signal {0} cannot be observed on this platform")]
    UnsupportedSignal(Signal),

    #[error("invalid log filter `{directive}`: {reason}")]
    InvalidLogLevel { directive: String, reason: String },
}

pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for &signal in &settings.signals.watch {
        if !seen.insert(signal) {
            errors.push(ValidationError::DuplicateSignal(signal));
        }
        if !signal.is_supported() {
            errors.push(ValidationError::UnsupportedSignal(signal));
        }
    }

    if let Err(e) = EnvFilter::try_new(&settings.logging.level) {
        errors.push(ValidationError::InvalidLogLevel {
            directive: settings.logging.level.clone(),
            reason: e.to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
