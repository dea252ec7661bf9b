//! Component contracts.
//!
//! # Data Flow
//! ```text
//! Caller-owned component (server, consumer, loop)
//!     → Listener (blocking run phase)
//!     → Closer (optional, unblocks the run phase)
//!     → entry.rs (explicit pairing, decided at configuration time)
//!     → lifecycle subsystem (chain / sequential / watcher)
//! ```
//!
//! # Design Decisions
//! - The release capability is paired with the listener up front, never
//!   discovered while shutting down
//! - Closers are synchronous so `stop()` never has to await anything
//! - A listener's own failures are invisible here; it logs and returns

pub mod entry;
pub mod nop;

pub use entry::ListenerEntry;
pub use nop::Nop;

use async_trait::async_trait;

use crate::error::BoxError;

/// A long-running component with a single blocking run phase.
///
/// `listen` returns when the component decides to stop on its own or after
/// its paired [`Closer`] has been invoked. It may also never return.
#[async_trait]
pub trait Listener: Send + Sync {
    async fn listen(&self);
}

/// A release-once capability.
///
/// Must be safe to call whether or not the paired listener's run phase has
/// started or returned; it is the mechanism used to unblock that run phase.
pub trait Closer: Send + Sync {
    fn close(&self) -> Result<(), BoxError>;
}
