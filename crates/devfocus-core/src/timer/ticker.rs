//! Cooperative 1 Hz tick driver.
//!
//! Each period is a fresh one-shot `sleep`, so a slow tick handler delays the
//! next tick instead of queueing a burst. Dropping or signalling the
//! [`TickerHandle`] stops the loop at the next await point.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Period used when none is configured.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: Duration,
}

impl Default for Ticker {
    fn default() -> Self {
        Self {
            period: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms.max(1)))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Call `on_tick` once per period until `shutdown` flips to `true` or
    /// its sender is dropped.
    pub async fn run<F>(self, mut shutdown: watch::Receiver<bool>, mut on_tick: F)
    where
        F: FnMut() + Send,
    {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.period) => on_tick(),
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("ticker stopped");
    }

    /// Spawn the loop on the current runtime.
    pub fn spawn<F>(self, on_tick: F) -> TickerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, rx) = watch::channel(false);
        let join = tokio::spawn(self.run(rx, on_tick));
        TickerHandle { stop: tx, join }
    }
}

/// Owner of a spawned ticker loop.
#[derive(Debug)]
pub struct TickerHandle {
    stop: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TickerHandle {
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    /// Stop and wait for the loop to exit.
    pub async fn shutdown(self) {
        self.stop();
        let _ = self.join.await;
    }
}
