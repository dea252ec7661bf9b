//! Structured logging.
//!
//! # Responsibilities
//! - Define the minimal `Logger` sink the lifecycle core writes notices to
//! - Forward notices to `tracing` by default
//! - Initialize the `tracing-subscriber` stack for binaries
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - JSON format for production, full or compact for development

use std::fmt;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as fmt_layer, EnvFilter};

use crate::config::schema::{LogFormat, LoggingConfig};

/// Sink for the few operator-facing notices the lifecycle core emits.
pub trait Logger: Send + Sync {
    /// Log a formatted message.
    fn log_fmt(&self, args: fmt::Arguments<'_>);

    /// Log a list of values separated by spaces.
    fn log_values(&self, values: &[&dyn fmt::Display]) {
        self.log_fmt(format_args!("{}", SpaceSeparated(values)));
    }
}

/// Default sink: every notice becomes an `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log_fmt(&self, args: fmt::Arguments<'_>) {
        tracing::info!(target: "dominoes", "{}", args);
    }
}

struct SpaceSeparated<'a>(&'a [&'a dyn fmt::Display]);

impl fmt::Display for SpaceSeparated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Install the global tracing subscriber.
///
/// Returns an error if a global subscriber is already set.
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Full => registry.with(fmt_layer::layer()).try_init(),
        LogFormat::Compact => registry.with(fmt_layer::layer().compact()).try_init(),
        LogFormat::Json => registry.with(fmt_layer::layer().json()).try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Vec<String>>);

    impl Logger for Capture {
        fn log_fmt(&self, args: fmt::Arguments<'_>) {
            self.0.lock().unwrap().push(args.to_string());
        }
    }

    #[test]
    fn log_values_joins_with_spaces() {
        let capture = Capture::default();
        capture.log_values(&[&"listener", &3, &"concluded"]);
        assert_eq!(capture.0.lock().unwrap().as_slice(), ["listener 3 concluded"]);
    }

    #[test]
    fn log_values_empty_list() {
        let capture = Capture::default();
        capture.log_values(&[]);
        assert_eq!(capture.0.lock().unwrap().as_slice(), [""]);
    }
}
