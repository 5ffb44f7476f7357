//! # DisplayListener — display sink
//!
//! Renders every [`ClockEvent`] on a [`ClockDisplay`]: brightness first (full
//! during the configured daytime window, dimmest otherwise), then the time.
//!
//! Bus failures surface as [`ListenerError::Failed`] for that one event; the
//! next clock event simply tries again.

use chrono::{FixedOffset, Timelike};
use parking_lot::Mutex;

use crate::clock::{ClockDisplay, MAX_BRIGHTNESS};
use crate::core::Config;
use crate::error::ListenerError;
use crate::events::{ClockEvent, Event};
use crate::listeners::Listener;

/// Listener that drives a clock display.
pub struct DisplayListener<D> {
    display: Mutex<D>,
    offset: FixedOffset,
    cfg: Config,
}

impl<D: ClockDisplay> DisplayListener<D> {
    pub fn new(display: D, cfg: &Config) -> Self {
        Self {
            display: Mutex::new(display),
            offset: cfg.utc_offset(),
            cfg: cfg.clone(),
        }
    }

    /// Runs `f` with the display locked.
    pub fn with_display<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        f(&mut self.display.lock())
    }

    fn brightness_for(&self, hour: u32) -> u8 {
        if self.cfg.is_daytime(hour) {
            MAX_BRIGHTNESS
        } else {
            0
        }
    }
}

impl<D: ClockDisplay> Listener for DisplayListener<D> {
    fn on_event(&self, ev: &Event) -> Result<(), ListenerError> {
        let clock = ev.payload::<ClockEvent>()?;
        let local = clock
            .local_time(self.offset)
            .ok_or_else(|| ListenerError::failed(format!("timestamp {} out of range", clock.timestamp())))?;

        let mut display = self.display.lock();
        display.set_brightness(self.brightness_for(local.hour()))?;
        display.set_time(local.hour(), local.minute())?;
        Ok(())
    }

    fn name(&self) -> &str {
        "clock-display"
    }
}
