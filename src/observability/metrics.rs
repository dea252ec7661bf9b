//! Metrics collection.
//!
//! # Metrics
//! - `dominoes_listeners_started_total` (counter): run phases entered
//! - `dominoes_listeners_concluded_total` (counter): run phases fully concluded
//! - `dominoes_listeners_running` (gauge): listener calls that have not returned yet
//! - `dominoes_cascade_hops_total` (counter): stop requests forwarded to a successor
//! - `dominoes_managed_resources_released_total` (counter): managed closers invoked
//! - `dominoes_signals_received_total` (counter, label `signal`): OS signals that triggered shutdown
//!
//! # Design Decisions
//! - Metric updates are fire-and-forget through the `metrics` facade

use metrics::{counter, gauge};

use crate::lifecycle::signals::Signal;

pub fn record_listener_started() {
    counter!("dominoes_listeners_started_total").increment(1);
    gauge!("dominoes_listeners_running").increment(1.0);
}

pub fn record_listener_returned() {
    gauge!("dominoes_listeners_running").decrement(1.0);
}

pub fn record_listener_concluded() {
    counter!("dominoes_listeners_concluded_total").increment(1);
}

pub fn record_cascade_hop() {
    counter!("dominoes_cascade_hops_total").increment(1);
}

pub fn record_managed_released(count: usize) {
    counter!("dominoes_managed_resources_released_total").increment(count as u64);
}

pub fn record_signal(signal: Signal) {
    counter!("dominoes_signals_received_total", "signal" => signal.as_str()).increment(1);
}
