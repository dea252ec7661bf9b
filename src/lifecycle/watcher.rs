//! Signal-triggered shutdown around any lifecycle component.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::latch::Latch;
use super::signals::{ArmedSignals, Signal};
use super::Lifecycle;
use crate::error::{BoxError, Error};
use crate::listener::{Closer, Listener};
use crate::observability::logging::Logger;
use crate::observability::metrics;

/// Room for signals delivered before the race task is polled.
const SIGNAL_BUFFER: usize = 4;

/// Stops the wrapped component when a configured signal arrives or when
/// `stop` is called, whichever happens first.
///
/// The inner component's `stop` runs exactly once either way.
pub struct SignalWatcher<C> {
    inner: Arc<C>,
    signals: Vec<Signal>,
    latch: Latch,
    sender: mpsc::Sender<Signal>,
    receiver: Mutex<Option<mpsc::Receiver<Signal>>>,
    logger: Arc<dyn Logger>,
}

impl<C: Lifecycle + 'static> SignalWatcher<C> {
    pub fn new(inner: C, signals: Vec<Signal>, logger: Arc<dyn Logger>) -> Self {
        let (sender, receiver) = mpsc::channel(SIGNAL_BUFFER);
        Self {
            inner: Arc::new(inner),
            signals,
            latch: Latch::new(),
            sender,
            receiver: Mutex::new(Some(receiver)),
            logger,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Signal kinds observed once started.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Deliver a signal in-process, as if the OS had raised it.
    ///
    /// Kinds this watcher does not observe are ignored. Returns `false` for
    /// those, or if the buffer is full or the watcher has already resolved.
    pub fn deliver(&self, signal: Signal) -> bool {
        if !self.signals.contains(&signal) {
            tracing::debug!(%signal, "Ignoring unwatched signal");
            return false;
        }
        self.sender.try_send(signal).is_ok()
    }

    /// Arm signal observation, then run the inner component to completion.
    ///
    /// # Panics
    ///
    /// Panics if the watcher was already started.
    pub async fn start(&self) {
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(receiver) = receiver else {
            panic!("signal watcher started twice");
        };

        let armed = ArmedSignals::arm(&self.signals);
        let race = tokio::spawn(race(
            armed,
            receiver,
            self.latch.clone(),
            self.inner.clone(),
            self.logger.clone(),
        ));

        self.inner.start().await;

        // Unblock the race if no signal ever arrived.
        self.latch.settle();
        if let Err(e) = race.await {
            tracing::error!(error = %e, "Signal watcher task failed");
        }
    }

    /// Request shutdown. Idempotent and non-blocking.
    pub fn stop(&self) {
        self.latch.settle();
    }
}

async fn race<C: Lifecycle>(
    mut armed: ArmedSignals,
    mut receiver: mpsc::Receiver<Signal>,
    latch: Latch,
    inner: Arc<C>,
    logger: Arc<dyn Logger>,
) {
    let received = tokio::select! {
        Some(signal) = receiver.recv() => Some(signal),
        signal = armed.recv() => Some(signal),
        _ = latch.settled() => None,
    };

    if let Some(signal) = received {
        metrics::record_signal(signal);
        logger.log_fmt(format_args!("[INFO] Received signal [{}]. Closing...", signal));
    }

    drop(armed);
    receiver.close();

    if let Err(e) = inner.stop() {
        tracing::warn!(error = %e, "Inner component failed to stop");
    }
}

#[async_trait]
impl<C: Lifecycle + 'static> Lifecycle for SignalWatcher<C> {
    async fn start(&self) {
        SignalWatcher::start(self).await
    }

    fn stop(&self) -> Result<(), Error> {
        SignalWatcher::stop(self);
        Ok(())
    }
}

#[async_trait]
impl<C: Lifecycle + 'static> Listener for SignalWatcher<C> {
    async fn listen(&self) {
        SignalWatcher::start(self).await
    }
}

impl<C: Lifecycle + 'static> Closer for SignalWatcher<C> {
    fn close(&self) -> Result<(), BoxError> {
        SignalWatcher::stop(self);
        Ok(())
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for SignalWatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalWatcher")
            .field("inner", &self.inner)
            .field("signals", &self.signals)
            .field("stopped", &self.latch.is_settled())
            .finish()
    }
}
