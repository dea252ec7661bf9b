//! Concurrent listener chain with cascading shutdown.
//!
//! # Responsibilities
//! - Run every configured listener concurrently, one task per listener
//! - Propagate shutdown strictly in configuration order, one hop at a time
//! - Release managed resources once the last listener has concluded
//!
//! # Design Decisions
//! - Nodes live in a `Vec`; a node's successor is the next index
//! - A hop fires only after the node's listener returned AND its latch settled,
//!   in either order, so a listener that ends on its own still cascades once
//!   shutdown reaches it
//! - `stop()` never touches the successor directly; the run phase does
//! - The chain topology is immutable after construction

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::latch::Latch;
use super::managed::ManagedResources;
use super::Lifecycle;
use crate::error::{BoxError, Error};
use crate::listener::{Closer, Listener, ListenerEntry};
use crate::observability::logging::Logger;
use crate::observability::metrics;

/// Handle to a chain of concurrently running listeners.
///
/// Cloning the handle shares the same chain.
#[derive(Clone)]
pub struct ListenerChain {
    inner: Arc<ChainInner>,
}

struct ChainInner {
    nodes: Vec<Node>,
    managed: ManagedResources,
    logger: Arc<dyn Logger>,
    started: AtomicBool,
}

struct Node {
    entry: ListenerEntry,
    /// Settled once this node has been asked to stop.
    latch: Latch,
    /// First stop request wins; later ones are no-ops.
    stopping: AtomicBool,
}

impl ListenerChain {
    /// Build a chain from an ordered list of listener slots.
    ///
    /// Every slot is checked before any node exists, so a rejected list never
    /// runs anything. Returns `Ok(None)` for an empty list; managed resources
    /// handed to an empty chain are dropped without being released.
    pub fn try_build(
        slots: Vec<Option<ListenerEntry>>,
        managed: Vec<Arc<dyn Closer>>,
        logger: Arc<dyn Logger>,
    ) -> Result<Option<Self>, Error> {
        if let Some(position) = slots.iter().position(Option::is_none) {
            return Err(Error::MissingListener { position });
        }
        if slots.is_empty() {
            return Ok(None);
        }

        let nodes: Vec<Node> = slots
            .into_iter()
            .flatten()
            .map(|entry| Node {
                entry,
                latch: Latch::new(),
                stopping: AtomicBool::new(false),
            })
            .collect();

        tracing::debug!(listeners = nodes.len(), managed = managed.len(), "Listener chain built");

        Ok(Some(Self {
            inner: Arc::new(ChainInner {
                nodes,
                managed: ManagedResources::new(managed),
                logger,
                started: AtomicBool::new(false),
            }),
        }))
    }

    /// Build a chain, failing fast on a misconfigured listener list.
    ///
    /// # Panics
    ///
    /// Panics if any slot is `None`.
    pub fn build(
        slots: Vec<Option<ListenerEntry>>,
        managed: Vec<Arc<dyn Closer>>,
        logger: Arc<dyn Logger>,
    ) -> Option<Self> {
        match Self::try_build(slots, managed, logger) {
            Ok(chain) => chain,
            Err(e) => panic!("{}", e),
        }
    }

    /// Number of listeners in the chain.
    pub fn len(&self) -> usize {
        self.inner.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.nodes.is_empty()
    }

    /// Listener names in chain order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.nodes.iter().map(|node| node.entry.name())
    }

    /// Run every listener and block until the whole cascade has concluded.
    ///
    /// The head listener runs on the calling task; every other listener gets
    /// a task of its own. Returns after the tail node has released the
    /// managed resources.
    ///
    /// # Panics
    ///
    /// Panics if the chain was already started.
    pub async fn start(&self) {
        if self.inner.started.swap(true, Ordering::AcqRel) {
            panic!("listener chain started twice");
        }

        let successors: Vec<_> = (1..self.inner.nodes.len())
            .map(|position| tokio::spawn(self.inner.clone().run_phase(position)))
            .collect();

        self.inner.clone().run_phase(0).await;

        for (offset, handle) in successors.into_iter().enumerate() {
            if let Err(e) = handle.await {
                let position = offset + 1;
                tracing::error!(
                    listener = self.inner.nodes[position].entry.name(),
                    position,
                    error = %e,
                    "Listener task failed"
                );
            }
        }
    }

    /// Ask the head listener to stop. Idempotent and non-blocking.
    pub fn stop(&self) {
        self.inner.stop_node(0);
    }
}

impl ChainInner {
    async fn run_phase(self: Arc<Self>, position: usize) {
        let node = &self.nodes[position];
        let name = node.entry.name();

        tracing::debug!(listener = name, position, "Listener starting");
        metrics::record_listener_started();

        // A panicking listener counts as returned so the cascade still runs.
        let listener = node.entry.listener().clone();
        match tokio::spawn(async move { listener.listen().await }).await {
            Ok(()) => tracing::debug!(listener = name, position, "Listener returned"),
            Err(e) => tracing::error!(
                listener = name,
                position,
                error = %e,
                "Listener task failed"
            ),
        }
        metrics::record_listener_returned();

        node.latch.settled().await;
        metrics::record_listener_concluded();

        let next = position + 1;
        if next < self.nodes.len() {
            tracing::debug!(listener = name, next = self.nodes[next].entry.name(), "Cascading stop");
            metrics::record_cascade_hop();
            self.stop_node(next);
        } else {
            self.managed.release_all();
            self.logger.log_fmt(format_args!("[INFO] All listeners have concluded."));
        }
    }

    fn stop_node(&self, position: usize) {
        let Some(node) = self.nodes.get(position) else {
            return;
        };
        if node.stopping.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Some(closer) = node.entry.closer() {
            if let Err(e) = closer.close() {
                tracing::warn!(
                    listener = node.entry.name(),
                    position,
                    error = %e,
                    "Listener failed to close"
                );
            }
        }
        node.latch.settle();
    }
}

#[async_trait]
impl Lifecycle for ListenerChain {
    async fn start(&self) {
        ListenerChain::start(self).await
    }

    fn stop(&self) -> Result<(), Error> {
        ListenerChain::stop(self);
        Ok(())
    }
}

#[async_trait]
impl Listener for ListenerChain {
    async fn listen(&self) {
        ListenerChain::start(self).await
    }
}

impl Closer for ListenerChain {
    fn close(&self) -> Result<(), BoxError> {
        ListenerChain::stop(self);
        Ok(())
    }
}

impl std::fmt::Debug for ListenerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerChain")
            .field("listeners", &self.names().collect::<Vec<_>>())
            .field("managed", &self.inner.managed)
            .field("started", &self.inner.started.load(Ordering::Acquire))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::Nop;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    /// Blocks in `listen` until closed.
    #[derive(Default)]
    struct Blocking {
        token: CancellationToken,
        closes: AtomicUsize,
    }

    #[async_trait]
    impl Listener for Blocking {
        async fn listen(&self) {
            self.token.cancelled().await
        }
    }

    impl Closer for Blocking {
        fn close(&self) -> Result<(), BoxError> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            self.token.cancel();
            Ok(())
        }
    }

    fn logger() -> Arc<dyn Logger> {
        Arc::new(Nop)
    }

    #[test]
    fn empty_slots_build_nothing() {
        let chain = ListenerChain::try_build(Vec::new(), Vec::new(), logger()).unwrap();
        assert!(chain.is_none());
    }

    #[test]
    fn missing_slot_is_rejected_with_position() {
        let slots = vec![Some(ListenerEntry::new(Arc::new(Nop))), None];
        let err = ListenerChain::try_build(slots, Vec::new(), logger()).unwrap_err();
        assert!(matches!(err, Error::MissingListener { position: 1 }));
    }

    #[test]
    #[should_panic(expected = "nil listener at position 0")]
    fn build_panics_on_missing_slot() {
        let _ = ListenerChain::build(vec![None], Vec::new(), logger());
    }

    #[test]
    fn names_follow_configuration_order() {
        let slots = vec![
            Some(ListenerEntry::new(Arc::new(Nop)).named("http")),
            Some(ListenerEntry::new(Arc::new(Nop)).named("grpc")),
        ];
        let chain = ListenerChain::build(slots, Vec::new(), logger()).unwrap();
        assert_eq!(chain.names().collect::<Vec<_>>(), ["http", "grpc"]);
        assert_eq!(chain.len(), 2);
    }

    #[tokio::test]
    async fn repeated_stop_closes_once() {
        let blocking = Arc::new(Blocking::default());
        let chain = ListenerChain::build(
            vec![Some(ListenerEntry::closable(blocking.clone()))],
            Vec::new(),
            logger(),
        )
        .unwrap();

        chain.stop();
        chain.stop();
        chain.start().await;
        chain.stop();

        assert_eq!(blocking.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[should_panic(expected = "listener chain started twice")]
    async fn second_start_panics() {
        let chain = ListenerChain::build(
            vec![Some(ListenerEntry::new(Arc::new(Nop)))],
            Vec::new(),
            logger(),
        )
        .unwrap();
        chain.stop();
        chain.start().await;
        chain.start().await;
    }

    #[tokio::test]
    async fn start_blocks_until_stopped() {
        let chain = ListenerChain::build(
            vec![Some(ListenerEntry::new(Arc::new(Nop)))],
            Vec::new(),
            logger(),
        )
        .unwrap();

        let pending = tokio::time::timeout(Duration::from_millis(5), chain.start()).await;
        assert!(pending.is_err(), "start returned without a stop request");
    }

    #[tokio::test]
    async fn stop_does_not_skip_ahead_of_a_running_node() {
        let head = Arc::new(Blocking::default());
        let middle = Arc::new(Blocking::default());
        let tail = Arc::new(Blocking::default());
        let chain = ListenerChain::build(
            vec![
                Some(ListenerEntry::closable(head.clone())),
                Some(ListenerEntry::closable(middle.clone())),
                Some(ListenerEntry::closable(tail.clone())),
            ],
            Vec::new(),
            logger(),
        )
        .unwrap();

        // Close the middle listener out of band: it returns, but its latch
        // is still unsettled, so the tail must keep running.
        let runner = tokio::spawn({
            let chain = chain.clone();
            async move { chain.start().await }
        });
        middle.token.cancel();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(tail.closes.load(Ordering::SeqCst), 0);
        assert!(!runner.is_finished());

        chain.stop();
        tokio::time::timeout(Duration::from_secs(1), runner)
            .await
            .expect("cascade should complete")
            .unwrap();

        assert_eq!(head.closes.load(Ordering::SeqCst), 1);
        assert_eq!(middle.closes.load(Ordering::SeqCst), 1);
        assert_eq!(tail.closes.load(Ordering::SeqCst), 1);
    }
}
