//! # Example: custom_listener
//!
//! Demonstrates how to build and attach a custom listener.
//!
//! Shows how to:
//! - Implement the [`Listener`] trait with consumer-side state.
//! - Read a payload with [`Event::payload`] and let a mismatch fail one invocation.
//! - Dispatch from inside a listener (re-entrant dispatch).
//! - Drive the queue by hand instead of through [`Runtime`](clockbus::Runtime).
//!
//! ## Run
//! ```bash
//! cargo run --example custom_listener
//! ```

use std::sync::Arc;

use chrono::Timelike;
use clockbus::{
    ClockEvent, Config, Event, EventDispatcher, EventQueue, Listener, ListenerError, Payload,
    SyncEvent,
};
use parking_lot::Mutex;

/// Counts minutes seen and announces every new hour with a sync-style event.
struct HourCounter {
    dispatcher: Arc<EventDispatcher>,
    cfg: Config,
    last_hour: Mutex<Option<u32>>,
}

impl Listener for HourCounter {
    fn on_event(&self, ev: &Event) -> Result<(), ListenerError> {
        let clock = ev.payload::<ClockEvent>()?;
        let local = clock
            .local_time(self.cfg.utc_offset())
            .ok_or_else(|| ListenerError::failed("timestamp out of range"))?;

        let mut last = self.last_hour.lock();
        if *last != Some(local.hour()) {
            *last = Some(local.hour());
            println!("[hour] new hour {:02}", local.hour());
            self.dispatcher
                .dispatch(SyncEvent::new(clock.timestamp(), vec!["hour-counter".into()]));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "hour-counter"
    }
}

fn main() {
    let cfg = Config::default();
    let queue = Arc::new(EventQueue::new());
    let dispatcher = Arc::new(EventDispatcher::new(Arc::clone(&queue)));

    dispatcher.listen(
        ClockEvent::ID,
        Arc::new(HourCounter {
            dispatcher: Arc::clone(&dispatcher),
            cfg: cfg.clone(),
            last_hour: Mutex::new(None),
        }),
    );
    dispatcher.listen_fn(SyncEvent::ID, "announce", |ev| {
        let sync = ev.payload::<SyncEvent>()?;
        println!("[sync] at={} from={:?}", sync.synced_at(), sync.servers());
        Ok(())
    });
    // Registered under the wrong id on purpose: fails for every SyncEvent, and only itself.
    dispatcher.listen_fn(SyncEvent::ID, "misrouted", |ev| {
        ev.payload::<ClockEvent>()?;
        Ok(())
    });

    let start = 1_700_000_000;
    for minute in 0..90 {
        dispatcher.dispatch(ClockEvent::new(start + minute * 60));
    }

    while let Some(delivery) = queue.pop() {
        if !delivery.is_clean() {
            println!(
                "[delivery] {} seq={} failed {}/{}",
                delivery.id, delivery.seq, delivery.failed, delivery.invoked
            );
        }
    }
}
