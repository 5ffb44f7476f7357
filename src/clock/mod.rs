//! Clock collaborators: time sources, the seven-segment display and its bus.
//!
//! None of these types know about the dispatch core. They are wired to it by
//! [`ClockProducer`](crate::ClockProducer) (producer side) and
//! [`DisplayListener`](crate::DisplayListener) (consumer side).

mod display;
mod i2c;
mod source;

pub use display::{ClockDisplay, Ht16k33Display, MAX_BRIGHTNESS};
pub use i2c::{I2cBus, RecordingBus};
pub use source::{MIN_SYNCED_YEAR, ManualClock, SystemClock, TimeSource, looks_synchronized};
