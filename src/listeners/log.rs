//! # LogWriter — logger sink
//!
//! A listener that writes clock and sync events as `tracing` records. Register
//! it for every id it should report.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO clockbus::listeners::log: time synchronized at 1700000000 via time.windows.com,pool.ntp.org seq=0 event=SyncEvent
//! INFO clockbus::listeners::log: clock 2023-11-14 17:13:20 -05:00 seq=1 event=ClockEvent
//! ```

use chrono::FixedOffset;
use tracing::info;

use crate::core::Config;
use crate::error::ListenerError;
use crate::events::{Event, EventKind};
use crate::listeners::Listener;

/// Logger sink.
pub struct LogWriter {
    offset: FixedOffset,
}

impl LogWriter {
    /// Construct a new [`LogWriter`] formatting times in the configured offset.
    #[must_use]
    pub fn new(cfg: &Config) -> Self {
        Self {
            offset: cfg.utc_offset(),
        }
    }

    /// Human-readable rendering of an event, as logged.
    pub fn format(&self, ev: &Event) -> String {
        match ev.kind() {
            EventKind::Clock(clock) => match clock.local_time(self.offset) {
                Some(local) => format!("clock {}", local.format("%Y-%m-%d %H:%M:%S %:z")),
                None => format!("clock timestamp={}", clock.timestamp()),
            },
            EventKind::Sync(sync) => format!(
                "time synchronized at {} via {}",
                sync.synced_at(),
                sync.servers().join(",")
            ),
        }
    }
}

impl Listener for LogWriter {
    fn on_event(&self, ev: &Event) -> Result<(), ListenerError> {
        info!(seq = ev.seq(), event = %ev.id(), "{}", self.format(ev));
        Ok(())
    }

    fn name(&self) -> &str {
        "log-writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ClockEvent, SyncEvent};

    #[test]
    fn test_formats_clock_in_local_offset() {
        let writer = LogWriter::new(&Config::default());
        let line = writer.format(&Event::from(ClockEvent::new(1_700_000_000)));
        assert_eq!(line, "clock 2023-11-14 17:13:20 -05:00");
    }

    #[test]
    fn test_formats_sync() {
        let writer = LogWriter::new(&Config::default());
        let ev = Event::from(SyncEvent::new(5, vec!["a".into(), "b".into()]));
        assert_eq!(writer.format(&ev), "time synchronized at 5 via a,b");
        assert!(writer.on_event(&ev).is_ok());
    }
}
