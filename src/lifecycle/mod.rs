//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Options → Configuration → ListenerChain → [SignalWatcher] → Dominoes
//!
//! Run (chain.rs):
//!     head listener on the caller's task, every other listener on its own task
//!
//! Shutdown (chain.rs, watcher.rs):
//!     stop() / signal → close head → head returns → close node 2 → ...
//!     → tail returns → release managed resources (managed.rs) → completion notice
//!
//! Signals (signals.rs):
//!     configured kinds (SIGINT, SIGTERM, ...) → watcher race → chain stop
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: one hop at a time, never skipping a running node
//! - Each node owns a one-shot latch (latch.rs); settling twice is harmless
//! - No timeouts: a listener that never returns holds back everything after it
//! - sequential.rs is the non-concurrent alternative (run in order, close in order)

pub mod chain;
pub mod latch;
pub mod managed;
pub mod sequential;
pub mod signals;
pub mod startup;
pub mod watcher;

pub use chain::ListenerChain;
pub use latch::Latch;
pub use managed::{ManagedResources, ShutdownHook};
pub use sequential::SequentialChain;
pub use signals::Signal;
pub use startup::Dominoes;
pub use watcher::SignalWatcher;

use async_trait::async_trait;

use crate::error::Error;

/// The start/stop surface shared by every composition.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Run until shutdown has fully completed.
    ///
    /// Calling `start` a second time on the same value is a precondition
    /// violation.
    async fn start(&self);

    /// Request shutdown. Safe to call any number of times.
    fn stop(&self) -> Result<(), Error>;
}
