mod engine;
mod ticker;

pub use engine::{format_hms, TimerEngine, TimerState};
pub use ticker::{Ticker, TickerHandle, DEFAULT_TICK_INTERVAL};
