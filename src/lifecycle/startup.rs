//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve options into a configuration (defaults applied)
//! - Build the listener chain in configuration order
//! - Wrap it in a signal watcher only when signals were requested
//!
//! # Design Decisions
//! - Fail fast: an empty strict listener slot panics here, before anything runs
//! - No signals configured means no watcher at all, not an idle one

use async_trait::async_trait;

use super::chain::ListenerChain;
use super::signals::Signal;
use super::watcher::SignalWatcher;
use super::Lifecycle;
use crate::config::{Configuration, Options};
use crate::error::Error;

/// The externally visible unit: `start` runs everything until the shutdown
/// cascade completes, `stop` triggers that cascade.
#[derive(Debug)]
pub enum Dominoes {
    Chain(ListenerChain),
    Watched(SignalWatcher<ListenerChain>),
}

impl Dominoes {
    /// # Panics
    ///
    /// Panics if a listener slot added through
    /// [`Options::add_listeners`] is `None`.
    pub fn new(options: Options) -> Self {
        let Configuration {
            listeners,
            managed,
            signals,
            logger,
        } = options.into_configuration();

        let Some(chain) = ListenerChain::build(listeners, managed, logger.clone()) else {
            unreachable!("configuration always carries at least one listener");
        };

        if signals.is_empty() {
            tracing::debug!(listeners = chain.len(), "Composed listener chain");
            return Dominoes::Chain(chain);
        }

        tracing::debug!(
            listeners = chain.len(),
            signals = ?signals,
            "Composed listener chain with signal watcher"
        );
        Dominoes::Watched(SignalWatcher::new(chain, signals, logger))
    }

    /// The listener chain at the core of this instance.
    pub fn chain(&self) -> &ListenerChain {
        match self {
            Dominoes::Chain(chain) => chain,
            Dominoes::Watched(watcher) => watcher.inner(),
        }
    }

    pub fn signal_watcher(&self) -> Option<&SignalWatcher<ListenerChain>> {
        match self {
            Dominoes::Chain(_) => None,
            Dominoes::Watched(watcher) => Some(watcher),
        }
    }

    /// Deliver a signal in-process. Returns `false` when no watcher is
    /// configured or the signal could not be queued.
    pub fn deliver(&self, signal: Signal) -> bool {
        self.signal_watcher()
            .is_some_and(|watcher| watcher.deliver(signal))
    }

    /// Block until every listener has concluded and managed resources are
    /// released.
    pub async fn start(&self) {
        match self {
            Dominoes::Chain(chain) => chain.start().await,
            Dominoes::Watched(watcher) => watcher.start().await,
        }
    }

    /// Trigger shutdown. Idempotent and non-blocking.
    pub fn stop(&self) {
        match self {
            Dominoes::Chain(chain) => chain.stop(),
            Dominoes::Watched(watcher) => watcher.stop(),
        }
    }
}

#[async_trait]
impl Lifecycle for Dominoes {
    async fn start(&self) {
        Dominoes::start(self).await
    }

    fn stop(&self) -> Result<(), Error> {
        Dominoes::stop(self);
        Ok(())
    }
}
