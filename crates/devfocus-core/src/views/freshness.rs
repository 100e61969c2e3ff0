//! Stale-result guard for per-window stores.
//!
//! A window loop yields on every backend call, so an older response can
//! arrive after a newer event has already refreshed the store. Each request
//! or inbound event takes a [`Ticket`] up front; its result is applied only
//! if no later ticket has been applied in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic position of one request or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct Freshness {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl Freshness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Claim the slice for `ticket`. Returns `false` when a newer ticket
    /// already wrote it, in which case the result must be dropped.
    pub fn accept(&self, ticket: Ticket) -> bool {
        self.applied.fetch_max(ticket.0, Ordering::SeqCst) < ticket.0
    }

    /// Issue and immediately accept. Used for inbound events that replace
    /// state synchronously.
    pub fn bump(&self) -> Ticket {
        let ticket = self.issue();
        self.accept(ticket);
        ticket
    }

    pub fn is_stale(&self, ticket: Ticket) -> bool {
        self.applied.load(Ordering::SeqCst) >= ticket.0
    }
}
