//! Non-concurrent composition: run one listener after another.

use async_trait::async_trait;

use super::Lifecycle;
use crate::error::{BoxError, Error};
use crate::listener::{Closer, Listener, ListenerEntry};

/// Runs listeners strictly in order on the calling task and closes them
/// strictly in order.
///
/// No cascading, no latches, no managed resources.
#[derive(Debug, Clone, Default)]
pub struct SequentialChain {
    entries: Vec<ListenerEntry>,
}

impl SequentialChain {
    pub fn new(entries: Vec<ListenerEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run each listener to completion before starting the next.
    pub async fn start(&self) {
        for (position, entry) in self.entries.iter().enumerate() {
            tracing::debug!(listener = entry.name(), position, "Sequential listener starting");
            entry.listener().listen().await;
        }
    }

    /// Close every closable entry in order.
    ///
    /// Returns the last failure; earlier failures are overwritten, so closers
    /// that need full detail must log it themselves.
    pub fn stop(&self) -> Result<(), Error> {
        let mut result = Ok(());
        for entry in &self.entries {
            let Some(closer) = entry.closer() else {
                continue;
            };
            if let Err(source) = closer.close() {
                result = Err(Error::Close {
                    name: entry.name().to_string(),
                    source,
                });
            }
        }
        result
    }
}

impl FromIterator<ListenerEntry> for SequentialChain {
    fn from_iter<I: IntoIterator<Item = ListenerEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl Lifecycle for SequentialChain {
    async fn start(&self) {
        SequentialChain::start(self).await
    }

    fn stop(&self) -> Result<(), Error> {
        SequentialChain::stop(self)
    }
}

#[async_trait]
impl Listener for SequentialChain {
    async fn listen(&self) {
        SequentialChain::start(self).await
    }
}

impl Closer for SequentialChain {
    fn close(&self) -> Result<(), BoxError> {
        SequentialChain::stop(self).map_err(Into::into)
    }
}
