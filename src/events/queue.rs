//! # Work queue between the dispatcher and the driver thread.
//!
//! [`EventQueue`] buffers `(event, listener snapshot)` entries until the single
//! consumer pops them.
//!
//! ## Architecture
//! ```text
//! Producers (many):                         Consumer (one):
//!   dispatch() ──► push() ──► [VecDeque] ──► pop() ──► listener 1 .. N
//!                   (lock)                  (lock)      (no lock held)
//! ```
//!
//! ## Rules
//! - **FIFO**: entries are popped in push order.
//! - **Unbounded**: `push()` never fails and never blocks beyond the lock.
//! - **No lock during callbacks**: `pop()` removes the head under the lock, releases
//!   it, then runs the listeners. Listeners may push new entries re-entrantly.
//! - **Isolation**: a listener that returns `Err` or panics is logged and skipped;
//!   the remaining listeners of the same entry still run.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave listener-owned state
//! inconsistent if a listener panics while holding its own lock.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, trace, warn};

use crate::events::{Event, EventId};
use crate::listeners::{Listener, ListenerRef};

/// Immutable listener sequence captured at dispatch time.
pub type ListenerSet = Arc<[ListenerRef]>;

/// One unit of queued work.
struct Entry {
    event: Event,
    listeners: ListenerSet,
}

/// Outcome of processing one queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Identifier of the delivered event.
    pub id: EventId,
    /// Sequence number of the delivered event.
    pub seq: u64,
    /// Number of listeners invoked.
    pub invoked: usize,
    /// Number of invocations that returned `Err` or panicked.
    pub failed: usize,
}

impl Delivery {
    /// True if every listener completed without error.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Thread-safe FIFO of dispatched events awaiting execution.
#[derive(Default)]
pub struct EventQueue {
    entries: Mutex<VecDeque<Entry>>,
}

impl EventQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event and the listeners that should receive it.
    ///
    /// Takes ownership of the event; it is dropped after its last listener returns.
    pub fn push(&self, event: Event, listeners: ListenerSet) {
        let mut entries = self.entries.lock();
        entries.push_back(Entry { event, listeners });
    }

    /// Removes the head entry and runs its listeners on the calling thread.
    ///
    /// Returns `None` (and does nothing) if the queue is empty.
    pub fn pop(&self) -> Option<Delivery> {
        let Entry { event, listeners } = {
            let mut entries = self.entries.lock();
            entries.pop_front()
        }?;

        let mut failed = 0;
        for listener in listeners.iter() {
            if !invoke(listener.as_ref(), &event) {
                failed += 1;
            }
        }

        trace!(
            event = %event.id(),
            seq = event.seq(),
            listeners = listeners.len(),
            failed,
            "event delivered"
        );

        Some(Delivery {
            id: event.id(),
            seq: event.seq(),
            invoked: listeners.len(),
            failed,
        })
    }

    /// Pops until the queue is empty; returns the number of entries processed.
    ///
    /// Entries pushed by listeners during the drain are processed by the same call.
    pub fn drain(&self) -> usize {
        let mut processed = 0;
        while self.pop().is_some() {
            processed += 1;
        }
        processed
    }

    /// Current number of entries. Advisory under concurrent pushes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.entries.lock().len()
    }

    /// True if there are no pending entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Runs one listener, containing errors and panics. Returns `true` on success.
fn invoke(listener: &dyn Listener, event: &Event) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(event))) {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            warn!(
                listener = listener.name(),
                event = %event.id(),
                seq = event.seq(),
                label = err.as_label(),
                "listener failed: {}",
                err.as_message()
            );
            false
        }
        Err(panic_err) => {
            error!(
                listener = listener.name(),
                event = %event.id(),
                seq = event.seq(),
                "listener panicked: {}",
                panic_message(&*panic_err)
            );
            false
        }
    }
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
