//! Per-window controllers.
//!
//! Each window owns a process-local store. Stores are written only by
//! backend-response handlers and sync-event handlers; render code reads a
//! snapshot. Backend failures set the store's `error` indicator and leave
//! everything else at its last-known-good value.

mod freshness;
mod main_view;
mod summary;
mod tracker;

use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::backend::{with_timeout, Backend, Clock};
use crate::error::{BackendError, CoreError};
use crate::storage::Config;
use crate::sync::{WindowHost, WindowManager};

pub use freshness::{Freshness, Ticket};
pub use main_view::{ActiveSession, MainStore, MainWindow};
pub use summary::{GeneralSummaryStore, GeneralSummaryWindow, TaskSummaryStore, TaskSummaryWindow};
pub use tracker::{TrackerWindow, TrackerWindowState};

/// What every controller needs: the backend, the window registry, the
/// client-side call policy and a clock.
pub struct ViewContext<B, H: WindowHost> {
    pub backend: Arc<B>,
    pub windows: Arc<WindowManager<H>>,
    pub timeout: Option<Duration>,
    clock: Clock,
}

impl<B, H: WindowHost> Clone for ViewContext<B, H> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            windows: self.windows.clone(),
            timeout: self.timeout,
            clock: self.clock.clone(),
        }
    }
}

impl<B: Backend, H: WindowHost> ViewContext<B, H> {
    pub fn new(backend: Arc<B>, windows: Arc<WindowManager<H>>) -> Self {
        Self {
            backend,
            windows,
            timeout: None,
            clock: Arc::new(Utc::now),
        }
    }

    /// Apply `backend.timeout_secs` from the config.
    pub fn configured(mut self, config: &Config) -> Self {
        self.timeout = config.backend.timeout_secs.map(Duration::from_secs);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Run one backend command under the configured timeout.
    pub async fn call<T, F>(&self, command: &'static str, call: F) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        with_timeout(command, self.timeout, call).await
    }
}

/// Lock a store, recovering the data if a panicking writer poisoned it.
fn lock<T>(store: &Mutex<T>) -> MutexGuard<'_, T> {
    store.lock().unwrap_or_else(|e| e.into_inner())
}

/// Record `err` on a store's error indicator and hand it back for `?`.
fn record<E: Into<CoreError>>(slot: &mut Option<String>, err: E) -> CoreError {
    let err = err.into();
    *slot = Some(err.to_string());
    err
}
