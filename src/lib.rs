//! Lifecycle orchestration for long-running listeners.
//!
//! Start N independent components concurrently, then shut them down in
//! configuration order, one hop at a time, when any caller asks, when a
//! watched OS signal arrives, or when a listener's stop request reaches it.
//! Managed resources are released once, after the last listener concludes.
//!
//! ```no_run
//! use std::sync::Arc;
//! use dominoes::{Dominoes, ListenerEntry, Nop, Options};
//!
//! # async fn run() {
//! let dominoes = Dominoes::new(
//!     Options::new()
//!         .add_listener(ListenerEntry::new(Arc::new(Nop)).named("worker"))
//!         .watch_terminate_signals(),
//! );
//! dominoes.start().await;
//! # }
//! ```

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod listener;
pub mod observability;

pub use config::{Options, Settings};
pub use error::{BoxError, Error};
pub use lifecycle::{Dominoes, Lifecycle, ListenerChain, SequentialChain, Signal, SignalWatcher};
pub use listener::{Closer, Listener, ListenerEntry, Nop};
pub use observability::logging::{Logger, TracingLogger};
