//! dominoes demo runner.
//!
//! Runs a handful of ticking listeners under a [`Dominoes`] chain and shuts
//! them down in order on SIGINT/SIGTERM (or whatever the settings file lists).
//!
//! ```text
//! dominoes --tickers 3 --interval-ms 500
//! dominoes --config dominoes.toml --signal SIGHUP
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use dominoes::config::{load_settings, Settings};
use dominoes::observability::logging::init_logging;
use dominoes::{BoxError, Closer, Dominoes, Listener, ListenerEntry, Options, Signal};

#[derive(Parser)]
#[command(name = "dominoes")]
#[command(about = "Run ticking listeners and shut them down in order", long_about = None)]
struct Cli {
    /// Settings file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticking listeners to run.
    #[arg(short, long, default_value_t = 3)]
    tickers: usize,

    /// Tick interval in milliseconds.
    #[arg(short, long, default_value_t = 1000)]
    interval_ms: u64,

    /// Extra signal kinds to watch (repeatable). With none here and none in
    /// the settings file, SIGINT and SIGTERM are watched.
    #[arg(short, long = "signal")]
    signals: Vec<Signal>,
}

/// Logs a tick every interval until closed.
struct Ticker {
    name: String,
    interval: Duration,
    token: CancellationToken,
}

#[async_trait]
impl Listener for Ticker {
    async fn listen(&self) {
        let mut ticker = tokio::time::interval(self.interval);
        let mut ticks = 0u64;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    ticks += 1;
                    tracing::info!(ticker = %self.name, ticks, "Tick");
                }
                _ = self.token.cancelled() => break,
            }
        }
        tracing::info!(ticker = %self.name, ticks, "Ticker stopped");
    }
}

impl Closer for Ticker {
    fn close(&self) -> Result<(), BoxError> {
        self.token.cancel();
        Ok(())
    }
}

/// Stand-in for a connection pool or similar shared resource.
struct Pool;

impl Closer for Pool {
    fn close(&self) -> Result<(), BoxError> {
        tracing::info!("Pool released");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    init_logging(&settings.logging)?;

    tracing::info!("dominoes v{} starting", env!("CARGO_PKG_VERSION"));

    let mut options = Options::new()
        .apply_settings(&settings)
        .watch_signals(cli.signals.iter().copied())
        .add_managed_resource(Arc::new(Pool));
    if settings.signals.watch.is_empty() && cli.signals.is_empty() {
        options = options.watch_terminate_signals();
    }

    let interval = Duration::from_millis(cli.interval_ms.max(1));
    for i in 0..cli.tickers {
        let name = format!("ticker-{}", i + 1);
        let ticker = Arc::new(Ticker {
            name: name.clone(),
            interval,
            token: CancellationToken::new(),
        });
        options = options.add_listener(ListenerEntry::closable(ticker).named(name));
    }

    let dominoes = Dominoes::new(options);
    tracing::info!(
        listeners = ?dominoes.chain().names().collect::<Vec<_>>(),
        "Listeners configured"
    );

    dominoes.start().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
