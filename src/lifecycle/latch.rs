//! One-shot, multi-observer latch.

use tokio_util::sync::CancellationToken;

/// Settles exactly once and stays settled.
///
/// `settle` is safe to call any number of times from any task. Every current
/// and future waiter on `settled` observes the transition.
#[derive(Debug, Clone, Default)]
pub struct Latch {
    token: CancellationToken,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settle the latch. Idempotent.
    pub fn settle(&self) {
        self.token.cancel();
    }

    pub fn is_settled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until the latch is settled. Completes immediately if it already is.
    pub async fn settled(&self) {
        self.token.cancelled().await
    }
}
