//! Options builder for the composition root.
//!
//! Collects listeners, managed resources, signal kinds, a logging sink and an
//! optional external cancellation hook, then resolves them into a
//! [`Configuration`] with defaults applied.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::schema::Settings;
use crate::lifecycle::managed::ShutdownHook;
use crate::lifecycle::signals::Signal;
use crate::listener::{Closer, ListenerEntry, Nop};
use crate::observability::logging::{Logger, TracingLogger};

/// Builder for a [`Dominoes`](crate::Dominoes) instance.
#[derive(Default)]
pub struct Options {
    listeners: Vec<Option<ListenerEntry>>,
    managed: Vec<Arc<dyn Closer>>,
    signals: Vec<Signal>,
    logger: Option<Arc<dyn Logger>>,
    shutdown: Option<CancellationToken>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(mut self, entry: ListenerEntry) -> Self {
        self.listeners.push(Some(entry));
        self
    }

    /// Append listener slots in order.
    ///
    /// Strict: an empty slot is kept and makes construction panic. Use
    /// [`add_optional_listeners`](Self::add_optional_listeners) when some
    /// components may be absent.
    pub fn add_listeners<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = Option<ListenerEntry>>,
    {
        self.listeners.extend(entries);
        self
    }

    /// Append listener slots in order, silently dropping empty ones.
    pub fn add_optional_listeners<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = Option<ListenerEntry>>,
    {
        self.listeners.extend(entries.into_iter().flatten().map(Some));
        self
    }

    /// Resources released once, after the last listener has concluded.
    pub fn add_managed_resource(mut self, resource: Arc<dyn Closer>) -> Self {
        self.managed.push(resource);
        self
    }

    /// Cancel `token` as the final managed resource.
    pub fn add_context_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub fn watch_signals<I>(mut self, signals: I) -> Self
    where
        I: IntoIterator<Item = Signal>,
    {
        self.signals.extend(signals);
        self
    }

    /// Watch SIGINT and SIGTERM.
    pub fn watch_terminate_signals(self) -> Self {
        self.watch_signals(Signal::TERMINATE_SET)
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Merge file-based settings into the builder.
    pub fn apply_settings(self, settings: &Settings) -> Self {
        self.watch_signals(settings.signals.watch.iter().copied())
    }

    /// Resolve the builder, applying defaults.
    ///
    /// - no logger: [`TracingLogger`]
    /// - no listeners: a single [`Nop`], so `start` still waits for `stop`
    /// - the cancellation hook, if any, is released after every other resource
    pub fn into_configuration(self) -> Configuration {
        let Options {
            mut listeners,
            mut managed,
            signals,
            logger,
            shutdown,
        } = self;

        if listeners.is_empty() {
            listeners.push(Some(ListenerEntry::new(Arc::new(Nop))));
        }
        if let Some(token) = shutdown {
            managed.push(Arc::new(ShutdownHook(token)));
        }

        Configuration {
            listeners,
            managed,
            signals,
            logger: logger.unwrap_or_else(|| Arc::new(TracingLogger)),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("listeners", &self.listeners)
            .field("managed", &self.managed.len())
            .field("signals", &self.signals)
            .field("custom_logger", &self.logger.is_some())
            .field("shutdown_hook", &self.shutdown.is_some())
            .finish()
    }
}

/// Resolved options, consumed once by the composition root.
pub struct Configuration {
    pub listeners: Vec<Option<ListenerEntry>>,
    pub managed: Vec<Arc<dyn Closer>>,
    pub signals: Vec<Signal>,
    pub logger: Arc<dyn Logger>,
}
