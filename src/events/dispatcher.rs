//! # Name-based routing from producers to listeners.
//!
//! [`EventDispatcher`] owns the registry (`EventId` → ordered listeners) and, on
//! every dispatch, resolves the listeners and enqueues the work on the shared
//! [`EventQueue`].
//!
//! ## Architecture
//! ```text
//! Producers (many):                                    Consumer (one):
//!   clock task ──┐
//!   thread N   ──┼──► dispatch(ev) ──► registry lookup ──► EventQueue ──► driver
//!   listener   ──┘        (registry lock held across lookup + push)
//! ```
//!
//! ## Rules
//! - **Snapshot at dispatch**: each registry value is an immutable `Arc<[ListenerRef]>`.
//!   `listen()` replaces it with a copy that has the new listener appended, so a queued
//!   entry keeps the listener set that was valid when it was dispatched.
//! - **Silent miss**: dispatching an id nobody listens to drops the event.
//! - **Lock order**: registry lock, then queue lock. The driver only takes the queue
//!   lock and never runs listeners under it, so re-entrant `dispatch`/`listen` from a
//!   listener cannot deadlock.
//! - **Cross-producer order** is the order in which `dispatch` calls acquire the
//!   registry lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::ListenerError;
use crate::events::queue::{EventQueue, ListenerSet};
use crate::events::{Event, EventId};
use crate::listeners::{ListenerFn, ListenerRef};

/// Thread-safe registry of listeners keyed by event identifier.
pub struct EventDispatcher {
    listeners: Mutex<HashMap<EventId, ListenerSet>>,
    queue: Arc<EventQueue>,
}

impl EventDispatcher {
    /// Creates a dispatcher that enqueues onto `queue`.
    #[must_use]
    pub fn new(queue: Arc<EventQueue>) -> Self {
        Self {
            listeners: Mutex::new(HashMap::new()),
            queue,
        }
    }

    /// Appends `listener` to the sequence registered under `id`.
    ///
    /// Duplicate registrations are kept and each fires. There is no unregister.
    pub fn listen(&self, id: EventId, listener: ListenerRef) {
        let name = listener.name().to_string();
        let mut listeners = self.listeners.lock();
        let set = listeners.entry(id).or_insert_with(|| Arc::from(Vec::new()));

        let mut next = Vec::with_capacity(set.len() + 1);
        next.extend(set.iter().cloned());
        next.push(listener);
        *set = next.into();

        debug!(event = %id, listener = %name, count = set.len(), "listener registered");
    }

    /// Registers a closure under `id`.
    ///
    /// Shorthand for `listen(id, ListenerFn::arc(name, f))`.
    pub fn listen_fn<F>(&self, id: EventId, name: &'static str, f: F)
    where
        F: Fn(&Event) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        self.listen(id, ListenerFn::arc(name, f));
    }

    /// Routes an event to the listeners registered for its id.
    ///
    /// Takes ownership of the event. Returns `true` if it was enqueued, `false` if
    /// nobody listens to its id (the event is dropped, which is not an error).
    pub fn dispatch(&self, event: impl Into<Event>) -> bool {
        let event = event.into();
        let listeners = self.listeners.lock();

        match listeners.get(&event.id()) {
            Some(set) if !set.is_empty() => {
                trace!(event = %event.id(), seq = event.seq(), "event enqueued");
                self.queue.push(event, Arc::clone(set));
                true
            }
            _ => {
                trace!(event = %event.id(), seq = event.seq(), "no listeners; event dropped");
                false
            }
        }
    }

    /// Number of listeners currently registered under `id`.
    #[must_use]
    pub fn listener_count(&self, id: EventId) -> usize {
        self.listeners.lock().get(&id).map_or(0, |set| set.len())
    }

    /// The queue this dispatcher feeds.
    #[inline]
    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::events::{ClockEvent, Payload, SyncEvent};

    fn setup() -> (Arc<EventQueue>, Arc<EventDispatcher>) {
        let queue = Arc::new(EventQueue::new());
        let dispatcher = Arc::new(EventDispatcher::new(Arc::clone(&queue)));
        (queue, dispatcher)
    }

    #[test]
    fn test_clock_event_reaches_listener() {
        let (queue, dispatcher) = setup();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        dispatcher.listen_fn(ClockEvent::ID, "a", move |ev| {
            let clock = ev.payload::<ClockEvent>()?;
            sink.lock().push((ev.id(), clock.timestamp()));
            Ok(())
        });

        assert_eq!(queue.size(), 0);
        assert!(dispatcher.dispatch(ClockEvent::new(1_700_000_000)));
        assert_eq!(queue.size(), 1);
        assert!(queue.pop().is_some());
        assert_eq!(queue.size(), 0);

        assert_eq!(*seen.lock(), vec![(EventId::new("ClockEvent"), 1_700_000_000)]);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let (queue, dispatcher) = setup();
        let log = Arc::new(Mutex::new(Vec::<(&str, Instant)>::new()));
        for tag in ["A", "B"] {
            let log = Arc::clone(&log);
            dispatcher.listen_fn(ClockEvent::ID, tag, move |_| {
                log.lock().push((tag, Instant::now()));
                Ok(())
            });
        }

        dispatcher.dispatch(ClockEvent::new(0));
        queue.pop();

        let log = log.lock();
        assert_eq!(log.iter().map(|(t, _)| *t).collect::<Vec<_>>(), ["A", "B"]);
        assert!(log[0].1 <= log[1].1);
    }

    #[test]
    fn test_every_listener_invoked_exactly_once_including_duplicates() {
        let (queue, dispatcher) = setup();
        let log = Arc::new(Mutex::new(Vec::new()));
        let shared: ListenerRef = {
            let log = Arc::clone(&log);
            ListenerFn::arc("dup", move |_: &Event| -> Result<(), ListenerError> {
                log.lock().push("dup");
                Ok(())
            })
        };
        for _ in 0..3 {
            dispatcher.listen(ClockEvent::ID, Arc::clone(&shared));
        }
        assert_eq!(dispatcher.listener_count(ClockEvent::ID), 3);

        dispatcher.dispatch(ClockEvent::new(0));
        let d = queue.pop().unwrap();
        assert_eq!(d.invoked, 3);
        assert_eq!(log.lock().len(), 3);
    }

    #[test]
    fn test_dispatch_without_listeners_is_dropped() {
        let (queue, dispatcher) = setup();
        dispatcher.listen_fn(ClockEvent::ID, "clock-only", |_| Ok(()));

        assert!(!dispatcher.dispatch(SyncEvent::new(0, vec![])));
        assert_eq!(queue.size(), 0);
        assert_eq!(dispatcher.listener_count(SyncEvent::ID), 0);
    }

    #[test]
    fn test_snapshot_is_taken_at_dispatch_time() {
        let (queue, dispatcher) = setup();
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&log);
        dispatcher.listen_fn(ClockEvent::ID, "first", move |_| {
            first.lock().push("first");
            Ok(())
        });

        dispatcher.dispatch(ClockEvent::new(1));
        let late = Arc::clone(&log);
        dispatcher.listen_fn(ClockEvent::ID, "late", move |_| {
            late.lock().push("late");
            Ok(())
        });
        queue.pop();
        assert_eq!(*log.lock(), ["first"]);

        dispatcher.dispatch(ClockEvent::new(2));
        queue.pop();
        assert_eq!(*log.lock(), ["first", "first", "late"]);
    }

    #[test]
    fn test_mismatch_is_isolated_to_one_listener() {
        let (queue, dispatcher) = setup();
        let hits = Arc::new(Mutex::new(0));
        dispatcher.listen_fn(ClockEvent::ID, "l1-wrong-variant", |ev| {
            ev.payload::<SyncEvent>()?;
            Ok(())
        });
        let counter = Arc::clone(&hits);
        dispatcher.listen_fn(ClockEvent::ID, "l2", move |_| {
            *counter.lock() += 1;
            Ok(())
        });

        dispatcher.dispatch(ClockEvent::new(1));
        dispatcher.dispatch(ClockEvent::new(2));
        let before = queue.size();
        let d = queue.pop().unwrap();

        assert_eq!(d.failed, 1);
        assert_eq!(*hits.lock(), 1);
        assert_eq!(queue.size(), before - 1);

        queue.pop();
        assert_eq!(*hits.lock(), 2);
    }

    #[test]
    fn test_reentrant_dispatch_and_listen() {
        let (queue, dispatcher) = setup();
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner = Arc::clone(&dispatcher);
        let sync_log = Arc::clone(&log);
        dispatcher.listen_fn(ClockEvent::ID, "forwarder", move |ev| {
            let clock = ev.payload::<ClockEvent>()?;
            let sync_log = Arc::clone(&sync_log);
            inner.listen_fn(SyncEvent::ID, "registered-inside", move |ev| {
                sync_log.lock().push(ev.payload::<SyncEvent>()?.synced_at());
                Ok(())
            });
            inner.dispatch(SyncEvent::new(clock.timestamp(), vec![]));
            Ok(())
        });

        dispatcher.dispatch(ClockEvent::new(42));
        let d = queue.pop().unwrap();
        assert!(d.is_clean());
        assert_eq!(queue.size(), 1);

        queue.pop();
        assert_eq!(*log.lock(), [42]);
        assert_eq!(dispatcher.listener_count(SyncEvent::ID), 1);
    }

    #[test]
    fn test_concurrent_producers_keep_their_own_order() {
        const PRODUCERS: i64 = 4;
        const PER_PRODUCER: i64 = 500;

        let (queue, dispatcher) = setup();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        dispatcher.listen_fn(ClockEvent::ID, "collect", move |ev| {
            sink.lock().push(ev.payload::<ClockEvent>()?.timestamp());
            Ok(())
        });

        let handles: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let dispatcher = Arc::clone(&dispatcher);
                std::thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        dispatcher.dispatch(ClockEvent::new(p * PER_PRODUCER + i));
                    }
                })
            })
            .collect();

        let mut popped = 0;
        while popped < PRODUCERS * PER_PRODUCER {
            if queue.pop().is_some() {
                popped += 1;
            } else {
                std::thread::yield_now();
            }
        }
        for h in handles {
            h.join().unwrap();
        }

        let seen = seen.lock();
        assert_eq!(seen.len() as i64, PRODUCERS * PER_PRODUCER);
        assert!(queue.is_empty());
        for p in 0..PRODUCERS {
            let own: Vec<i64> = seen.iter().copied().filter(|t| t / PER_PRODUCER == p).collect();
            assert_eq!(own, (p * PER_PRODUCER..(p + 1) * PER_PRODUCER).collect::<Vec<_>>());
        }
    }
}
