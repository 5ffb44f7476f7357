//! # Driver loop: the single consumer of the event queue.
//!
//! [`Driver`] repeatedly drains the [`EventQueue`] on one dedicated OS thread.
//! Every listener runs on that thread, so a blocking listener (bus write)
//! delays every later entry. That is the single-consumer contract.
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► pop until empty or cancelled (listeners run here, no lock held)
//!   ├─► token cancelled? ──► pop the entries queued right now, exit
//!   └─► sleep(poll_interval)
//! }
//! ```

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::Config;
use crate::events::EventQueue;

/// Name of the driver thread.
pub const DRIVER_THREAD_NAME: &str = "clockbus-driver";

/// Single consumer that drains the queue until cancelled.
pub struct Driver {
    queue: Arc<EventQueue>,
    poll_interval: Duration,
}

impl Driver {
    /// Creates a driver for `queue` using the configured poll interval.
    pub fn new(queue: Arc<EventQueue>, cfg: &Config) -> Self {
        Self {
            queue,
            poll_interval: cfg.poll_interval(),
        }
    }

    /// Runs the loop on the calling thread until `token` is cancelled.
    ///
    /// The token is checked between entries, so listeners that keep
    /// re-dispatching cannot hold the driver past cancellation. Entries queued
    /// when cancellation is observed are processed once more before returning;
    /// anything they dispatch stays queued. Returns the number of entries
    /// processed.
    pub fn run(&self, token: &CancellationToken) -> u64 {
        let mut processed: u64 = 0;
        debug!(poll = ?self.poll_interval, "driver started");

        loop {
            while !token.is_cancelled() && self.queue.pop().is_some() {
                processed += 1;
            }
            if token.is_cancelled() {
                break;
            }
            thread::sleep(self.poll_interval);
        }

        let pending = self.queue.size();
        processed += (0..pending).take_while(|_| self.queue.pop().is_some()).count() as u64;

        let left = self.queue.size();
        if left > 0 {
            debug!(left, "entries dispatched during the final drain left queued");
        }
        info!(processed, "driver stopped");
        processed
    }

    /// Moves the driver onto a dedicated, named OS thread.
    pub fn spawn(self, token: CancellationToken) -> io::Result<JoinHandle<u64>> {
        thread::Builder::new()
            .name(DRIVER_THREAD_NAME.to_string())
            .spawn(move || self.run(&token))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::error::ListenerError;
    use crate::events::{ClockEvent, Event, EventDispatcher, Payload};

    fn fast() -> Config {
        Config {
            poll_interval: Duration::from_millis(1),
            ..Config::default()
        }
    }

    #[test]
    fn test_run_returns_after_final_drain_when_cancelled() {
        let queue = Arc::new(EventQueue::new());
        let dispatcher = EventDispatcher::new(Arc::clone(&queue));
        dispatcher.listen_fn(ClockEvent::ID, "noop", |_| Ok(()));
        for t in 0..5 {
            dispatcher.dispatch(ClockEvent::new(t));
        }

        let token = CancellationToken::new();
        token.cancel();
        let processed = Driver::new(Arc::clone(&queue), &fast()).run(&token);

        assert_eq!(processed, 5);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_spawned_driver_runs_listeners_on_its_own_thread() {
        let queue = Arc::new(EventQueue::new());
        let dispatcher = EventDispatcher::new(Arc::clone(&queue));
        let (tx, rx) = std::sync::mpsc::channel();
        dispatcher.listen_fn(ClockEvent::ID, "thread-probe", move |ev: &Event| {
            let name = thread::current().name().map(str::to_string);
            tx.send((name, ev.payload::<ClockEvent>()?.timestamp()))
                .map_err(|e| ListenerError::failed(e.to_string()))
        });

        let token = CancellationToken::new();
        let handle = Driver::new(Arc::clone(&queue), &fast())
            .spawn(token.clone())
            .unwrap();

        dispatcher.dispatch(ClockEvent::new(99));
        let (name, ts) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some(DRIVER_THREAD_NAME));
        assert_eq!(ts, 99);

        token.cancel();
        assert_eq!(handle.join().unwrap(), 1);
    }

    #[test]
    fn test_cancel_is_observed_while_a_listener_rearms_itself() {
        let queue = Arc::new(EventQueue::new());
        let dispatcher = Arc::new(EventDispatcher::new(Arc::clone(&queue)));
        let inner = Arc::clone(&dispatcher);
        dispatcher.listen_fn(ClockEvent::ID, "heartbeat", move |ev| {
            thread::sleep(Duration::from_millis(1));
            inner.dispatch(ClockEvent::new(ev.payload::<ClockEvent>()?.timestamp() + 1));
            Ok(())
        });
        dispatcher.dispatch(ClockEvent::new(0));

        let token = CancellationToken::new();
        let handle = Driver::new(Arc::clone(&queue), &fast())
            .spawn(token.clone())
            .unwrap();

        thread::sleep(Duration::from_millis(50));
        token.cancel();

        let deadline = Instant::now() + Duration::from_secs(2);
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(handle.is_finished(), "driver kept running after cancellation");

        let processed = handle.join().unwrap();
        assert!(processed > 1, "processed {processed}");
        // The entry re-armed by the last invocation is left for nobody.
        assert_eq!(queue.size(), 1);
    }
}
