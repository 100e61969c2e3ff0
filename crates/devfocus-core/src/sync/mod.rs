//! Cross-window synchronization.
//!
//! Windows share no memory. State changes travel as named events (see
//! [`events`]) between fixed window labels held in a [`WindowManager`].
//! Delivery is at-most-once with no ordering across event names; a missing
//! target is normal. Receivers treat inbound payloads as triggers for a full
//! refetch, except `tracker:load`, which fully replaces the tracker's state.

pub mod bootstrap;
mod browser;
pub mod events;
pub mod memory;
mod window;

pub use bootstrap::Bootstrap;
pub use browser::BrowserWindowHost;
pub use events::{SyncEvent, TaskRef, TrackerAction, TrackerLoad, TrackerUpdated, EVENT_NAMES};
pub use memory::MemoryWindowHost;
pub use window::{
    Delivery, Presentation, WindowGeometry, WindowHost, WindowLabel, WindowManager, WindowSpec,
};
