//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dominoes::{BoxError, Closer, Listener, ListenerEntry, Logger};

/// Records close calls; optionally fails.
#[derive(Default)]
pub struct FakeResource {
    close_count: AtomicUsize,
    close_time: Mutex<Option<Instant>>,
    close_error: Mutex<Option<&'static str>>,
}

impl FakeResource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(message: &'static str) -> Arc<Self> {
        let resource = Self::default();
        *resource.close_error.lock().unwrap() = Some(message);
        Arc::new(resource)
    }

    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }

    pub fn close_time(&self) -> Instant {
        self.close_time.lock().unwrap().expect("never closed")
    }
}

impl Closer for FakeResource {
    fn close(&self) -> Result<(), BoxError> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        *self.close_time.lock().unwrap() = Some(Instant::now());
        std::thread::sleep(Duration::from_micros(10));
        match *self.close_error.lock().unwrap() {
            Some(message) => Err(message.into()),
            None => Ok(()),
        }
    }
}

/// Returns from `listen` on its own almost immediately, recording the call.
#[derive(Default)]
pub struct FakeListener {
    listen_count: AtomicUsize,
    listen_time: Mutex<Option<Instant>>,
    pub resource: FakeResource,
}

impl FakeListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(message: &'static str) -> Arc<Self> {
        let listener = Self::default();
        *listener.resource.close_error.lock().unwrap() = Some(message);
        Arc::new(listener)
    }

    pub fn listen_count(&self) -> usize {
        self.listen_count.load(Ordering::SeqCst)
    }

    pub fn listen_time(&self) -> Instant {
        self.listen_time.lock().unwrap().expect("never listened")
    }

    pub fn close_count(&self) -> usize {
        self.resource.close_count()
    }

    pub fn close_time(&self) -> Instant {
        self.resource.close_time()
    }
}

#[async_trait]
impl Listener for FakeListener {
    async fn listen(&self) {
        self.listen_count.fetch_add(1, Ordering::SeqCst);
        *self.listen_time.lock().unwrap() = Some(Instant::now());
        std::thread::sleep(Duration::from_micros(10));
    }
}

impl Closer for FakeListener {
    fn close(&self) -> Result<(), BoxError> {
        self.resource.close()
    }
}

pub fn entry(listener: &Arc<FakeListener>) -> ListenerEntry {
    ListenerEntry::closable(listener.clone())
}

/// Panics as soon as it is run.
pub struct PanickingListener;

#[async_trait]
impl Listener for PanickingListener {
    async fn listen(&self) {
        panic!("listener blew up");
    }
}

impl Closer for PanickingListener {
    fn close(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

pub fn panicking() -> ListenerEntry {
    ListenerEntry::closable(Arc::new(PanickingListener))
}

/// Captures notices with the instant they were logged.
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(Instant, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn logged_at(&self, line: &str) -> Instant {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .find(|(_, logged)| logged == line)
            .map(|(at, _)| *at)
            .expect("line not logged")
    }
}

impl Logger for RecordingLogger {
    fn log_fmt(&self, args: fmt::Arguments<'_>) {
        self.lines
            .lock()
            .unwrap()
            .push((Instant::now(), args.to_string()));
    }
}

pub const CONCLUDED: &str = "[INFO] All listeners have concluded.";

/// Spawn a task that calls `stop` after a millisecond.
pub fn stop_after_delay<F>(stop: F)
where
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        stop();
    });
}
