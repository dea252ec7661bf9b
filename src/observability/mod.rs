//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Lifecycle subsystem produces:
//!     → logging.rs (Logger sink for operator notices, tracing events for internals)
//!     → metrics.rs (counters and gauges through the `metrics` facade)
//!
//! Consumers:
//!     → tracing-subscriber fmt layer (stdout, full / compact / json)
//!     → whatever metrics recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Operator-facing notices ("signal received", "all listeners concluded")
//!   go through the pluggable `Logger` sink; everything else is `tracing`
//! - The library never installs a metrics exporter; recording is a no-op
//!   until the host installs a recorder

pub mod logging;
pub mod metrics;
