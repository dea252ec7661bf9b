//! Do-nothing listener and logging sink.

use std::fmt;

use async_trait::async_trait;

use super::Listener;
use crate::observability::logging::Logger;

/// Returns from `listen` immediately and discards every log line.
///
/// Stands in for an empty listener list so that `start` still blocks until
/// `stop` is requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nop;

#[async_trait]
impl Listener for Nop {
    async fn listen(&self) {}
}

impl Logger for Nop {
    fn log_fmt(&self, _args: fmt::Arguments<'_>) {}

    fn log_values(&self, _values: &[&dyn fmt::Display]) {}
}
