//! Auxiliary resources released once, after every listener has concluded.

use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::error::BoxError;
use crate::listener::Closer;
use crate::observability::metrics;

/// A flat set of closers released together, exactly once.
#[derive(Default)]
pub struct ManagedResources {
    resources: Mutex<Vec<Arc<dyn Closer>>>,
}

impl ManagedResources {
    pub fn new(resources: Vec<Arc<dyn Closer>>) -> Self {
        Self {
            resources: Mutex::new(resources),
        }
    }

    /// Number of resources not yet released.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close every resource in order. Later calls find nothing to release.
    ///
    /// Failures are logged and swallowed so one bad resource never blocks
    /// the rest of shutdown.
    pub fn release_all(&self) {
        let resources = std::mem::take(&mut *self.lock());
        if resources.is_empty() {
            return;
        }

        for (index, resource) in resources.iter().enumerate() {
            if let Err(e) = resource.close() {
                tracing::warn!(index, error = %e, "Managed resource failed to close");
            }
        }

        metrics::record_managed_released(resources.len());
        tracing::debug!(count = resources.len(), "Managed resources released");
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn Closer>>> {
        self.resources.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ManagedResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedResources")
            .field("pending", &self.len())
            .finish()
    }
}

/// Adapts an external cancellation hook into a managed resource.
#[derive(Debug, Clone)]
pub struct ShutdownHook(pub CancellationToken);

impl Closer for ShutdownHook {
    fn close(&self) -> Result<(), BoxError> {
        self.0.cancel();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        closed: AtomicUsize,
        fail: bool,
    }

    impl Closer for Counting {
        fn close(&self) -> Result<(), BoxError> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err("boom".into())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn releases_each_resource_once() {
        let first = Arc::new(Counting::default());
        let second = Arc::new(Counting::default());
        let managed = ManagedResources::new(vec![
            first.clone() as Arc<dyn Closer>,
            second.clone() as Arc<dyn Closer>,
        ]);
        assert_eq!(managed.len(), 2);

        managed.release_all();
        managed.release_all();

        assert_eq!(first.closed.load(Ordering::SeqCst), 1);
        assert_eq!(second.closed.load(Ordering::SeqCst), 1);
        assert!(managed.is_empty());
    }

    #[test]
    fn failure_does_not_stop_the_rest() {
        let failing = Arc::new(Counting {
            fail: true,
            ..Default::default()
        });
        let after = Arc::new(Counting::default());
        let managed = ManagedResources::new(vec![
            failing.clone() as Arc<dyn Closer>,
            after.clone() as Arc<dyn Closer>,
        ]);

        managed.release_all();

        assert_eq!(failing.closed.load(Ordering::SeqCst), 1);
        assert_eq!(after.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shutdown_hook_cancels_token() {
        let token = CancellationToken::new();
        ShutdownHook(token.clone()).close().unwrap();
        assert!(token.is_cancelled());
    }
}
