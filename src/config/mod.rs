//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!
//! code
//!     → options.rs (listeners, managed resources, signals, logger, hook)
//!     → Options::apply_settings(&Settings)
//!     → Options::into_configuration() (defaults applied)
//!     → Dominoes::new
//! ```
//!
//! # Design Decisions
//! - Config is consumed once at construction and never mutated after
//! - All file fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod options;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, parse_settings, ConfigError};
pub use options::{Configuration, Options};
pub use schema::{LogFormat, LoggingConfig, SignalConfig, Settings};
