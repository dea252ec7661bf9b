//! OS signal handling.
//!
//! # Responsibilities
//! - Name the signal kinds a watcher can observe
//! - Register handlers for a configured set of kinds
//! - Resolve to whichever configured kind arrives first
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A kind that cannot be registered is logged and skipped, never fatal
//! - On non-unix platforms only SIGINT is observable (via Ctrl+C)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A signal kind a [`SignalWatcher`](super::watcher::SignalWatcher) can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Signal {
    Interrupt,
    Terminate,
    Hangup,
    Quit,
    User1,
    User2,
}

impl Signal {
    /// SIGINT and SIGTERM.
    pub const TERMINATE_SET: [Signal; 2] = [Signal::Interrupt, Signal::Terminate];

    pub const ALL: [Signal; 6] = [
        Signal::Interrupt,
        Signal::Terminate,
        Signal::Hangup,
        Signal::Quit,
        Signal::User1,
        Signal::User2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Hangup => "SIGHUP",
            Signal::Quit => "SIGQUIT",
            Signal::User1 => "SIGUSR1",
            Signal::User2 => "SIGUSR2",
        }
    }

    /// Whether this kind can be observed on the current platform.
    pub fn is_supported(self) -> bool {
        cfg!(unix) || self == Signal::Interrupt
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown signal `{0}`")]
pub struct UnknownSignal(pub String);

impl FromStr for Signal {
    type Err = UnknownSignal;

    /// Accepts `SIGINT`, `INT` and `interrupt`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let short = upper.strip_prefix("SIG").unwrap_or(&upper);
        match short {
            "INT" | "INTERRUPT" => Ok(Signal::Interrupt),
            "TERM" | "TERMINATE" => Ok(Signal::Terminate),
            "HUP" | "HANGUP" => Ok(Signal::Hangup),
            "QUIT" => Ok(Signal::Quit),
            "USR1" | "USER1" => Ok(Signal::User1),
            "USR2" | "USER2" => Ok(Signal::User2),
            _ => Err(UnknownSignal(s.to_string())),
        }
    }
}

impl TryFrom<String> for Signal {
    type Error = UnknownSignal;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Signal> for String {
    fn from(signal: Signal) -> Self {
        signal.as_str().to_string()
    }
}

/// Registered handlers for a set of signal kinds.
///
/// Dropping the value stops this watcher from seeing further signals, but
/// the default disposition is not restored: tokio keeps its process-wide
/// handler installed, so a later SIGINT or SIGTERM no longer terminates the
/// process on its own.
pub struct ArmedSignals {
    #[cfg(unix)]
    handlers: Vec<(Signal, tokio::signal::unix::Signal)>,
    #[cfg(not(unix))]
    ctrl_c: bool,
}

impl ArmedSignals {
    /// Register a handler for each kind. Kinds that fail to register are skipped.
    #[cfg(unix)]
    pub fn arm(signals: &[Signal]) -> Self {
        use tokio::signal::unix::{signal, SignalKind};

        let mut handlers = Vec::with_capacity(signals.len());
        for &kind in signals {
            let raw = match kind {
                Signal::Interrupt => SignalKind::interrupt(),
                Signal::Terminate => SignalKind::terminate(),
                Signal::Hangup => SignalKind::hangup(),
                Signal::Quit => SignalKind::quit(),
                Signal::User1 => SignalKind::user_defined1(),
                Signal::User2 => SignalKind::user_defined2(),
            };
            match signal(raw) {
                Ok(handler) => handlers.push((kind, handler)),
                Err(e) => {
                    tracing::warn!(signal = %kind, error = %e, "Failed to register signal handler");
                }
            }
        }

        tracing::debug!(armed = handlers.len(), "Signal handlers armed");
        Self { handlers }
    }

    #[cfg(not(unix))]
    pub fn arm(signals: &[Signal]) -> Self {
        for kind in signals.iter().filter(|kind| !kind.is_supported()) {
            tracing::warn!(signal = %kind, "Signal not supported on this platform");
        }
        Self {
            ctrl_c: signals.contains(&Signal::Interrupt),
        }
    }

    /// Number of kinds actually being observed.
    pub fn len(&self) -> usize {
        #[cfg(unix)]
        {
            self.handlers.len()
        }
        #[cfg(not(unix))]
        {
            usize::from(self.ctrl_c)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait for the first configured kind to arrive.
    ///
    /// Never completes if nothing is armed.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> Signal {
        use std::task::Poll;

        std::future::poll_fn(|cx| {
            for (kind, handler) in self.handlers.iter_mut() {
                if let Poll::Ready(Some(())) = handler.poll_recv(cx) {
                    return Poll::Ready(*kind);
                }
            }
            Poll::Pending
        })
        .await
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> Signal {
        if self.ctrl_c && tokio::signal::ctrl_c().await.is_ok() {
            return Signal::Interrupt;
        }
        std::future::pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_spellings() {
        assert_eq!("SIGINT".parse::<Signal>().unwrap(), Signal::Interrupt);
        assert_eq!("term".parse::<Signal>().unwrap(), Signal::Terminate);
        assert_eq!("Hangup".parse::<Signal>().unwrap(), Signal::Hangup);
        assert_eq!(" sigusr2 ".parse::<Signal>().unwrap(), Signal::User2);
        assert!("SIGKILL".parse::<Signal>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        for signal in Signal::ALL {
            assert_eq!(signal.to_string().parse::<Signal>().unwrap(), signal);
        }
    }

    #[test]
    fn interrupt_is_supported_everywhere() {
        assert!(Signal::Interrupt.is_supported());
    }

    #[tokio::test]
    async fn arming_nothing_observes_nothing() {
        let mut armed = ArmedSignals::arm(&[]);
        assert!(armed.is_empty());
        let pending =
            tokio::time::timeout(std::time::Duration::from_millis(5), armed.recv()).await;
        assert!(pending.is_err());
    }
}
