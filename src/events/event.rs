//! # Events routed through the dispatcher.
//!
//! [`Event`] is a closed sum type: each variant wraps one payload struct and maps
//! to exactly one [`EventId`]. The id is what the dispatcher routes on; the
//! payload is what listeners read.
//!
//! ## Variants
//! - [`ClockEvent`] (`"ClockEvent"`): a local time sample from the clock source
//! - [`SyncEvent`] (`"SyncEvent"`): the clock source observed a synchronized clock
//!
//! ## Ordering
//! Each event carries a process-wide sequence number (`seq`) assigned at
//! construction. It is for logs only; delivery order is queue order.
//!
//! ## Example
//! ```rust
//! use clockbus::{ClockEvent, Event, Payload};
//!
//! let ev = Event::from(ClockEvent::new(1_700_000_000));
//! assert_eq!(ev.id(), ClockEvent::ID);
//! assert_eq!(ev.payload::<ClockEvent>().unwrap().timestamp(), 1_700_000_000);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::ListenerError;

/// Global sequence counter for event ordering in logs.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Routing key for an event variant.
///
/// Equality and hashing are by string value, never by pointer identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(&'static str);

impl EventId {
    /// Creates an identifier from a static name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the identifier as a string.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Payload type that corresponds to exactly one [`Event`] variant.
pub trait Payload: Sized {
    /// Identifier shared by every instance of this variant.
    const ID: EventId;

    /// Borrows the payload if `event` is this variant.
    fn from_event(event: &Event) -> Option<&Self>;
}

/// Local time sample produced by the clock source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockEvent {
    timestamp: i64,
}

impl ClockEvent {
    /// Creates a clock event for the given Unix timestamp (seconds).
    #[must_use]
    pub fn new(timestamp: i64) -> Self {
        Self { timestamp }
    }

    /// Unix timestamp (seconds) of the sample.
    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The sample as a date-time in the given offset.
    ///
    /// Returns `None` if the timestamp is out of chrono's range.
    pub fn local_time(&self, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
        DateTime::<Utc>::from_timestamp(self.timestamp, 0).map(|t| t.with_timezone(&offset))
    }
}

impl Payload for ClockEvent {
    const ID: EventId = EventId::new("ClockEvent");

    fn from_event(event: &Event) -> Option<&Self> {
        match &event.kind {
            EventKind::Clock(c) => Some(c),
            _ => None,
        }
    }
}

/// Emitted once when the clock source first reports a synchronized clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEvent {
    synced_at: i64,
    servers: Vec<String>,
}

impl SyncEvent {
    /// Creates a sync notification.
    #[must_use]
    pub fn new(synced_at: i64, servers: Vec<String>) -> Self {
        Self { synced_at, servers }
    }

    /// Unix timestamp (seconds) at which synchronization was observed.
    #[inline]
    pub fn synced_at(&self) -> i64 {
        self.synced_at
    }

    /// Time servers the clock was configured with.
    #[inline]
    pub fn servers(&self) -> &[String] {
        &self.servers
    }
}

impl Payload for SyncEvent {
    const ID: EventId = EventId::new("SyncEvent");

    fn from_event(event: &Event) -> Option<&Self> {
        match &event.kind {
            EventKind::Sync(s) => Some(s),
            _ => None,
        }
    }
}

/// Variant payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Clock(ClockEvent),
    Sync(SyncEvent),
}

/// Immutable event handed from a producer to the dispatch pipeline.
#[derive(Debug)]
pub struct Event {
    seq: u64,
    kind: EventKind,
}

impl Event {
    /// Wraps a payload and assigns the next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
        }
    }

    /// Routing identifier of this event's variant.
    #[inline]
    pub fn id(&self) -> EventId {
        match self.kind {
            EventKind::Clock(_) => ClockEvent::ID,
            EventKind::Sync(_) => SyncEvent::ID,
        }
    }

    /// Monotonic sequence number assigned at construction.
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    #[inline]
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Checked typed access to the payload.
    ///
    /// Returns [`ListenerError::TypeMismatch`] when this event is a different variant,
    /// so a listener can simply `?` it.
    pub fn payload<T: Payload>(&self) -> Result<&T, ListenerError> {
        T::from_event(self).ok_or(ListenerError::TypeMismatch {
            expected: T::ID,
            actual: self.id(),
        })
    }

    #[inline]
    pub fn as_clock(&self) -> Option<&ClockEvent> {
        ClockEvent::from_event(self)
    }

    #[inline]
    pub fn as_sync(&self) -> Option<&SyncEvent> {
        SyncEvent::from_event(self)
    }
}

impl From<EventKind> for Event {
    fn from(kind: EventKind) -> Self {
        Event::new(kind)
    }
}

impl From<ClockEvent> for Event {
    fn from(ev: ClockEvent) -> Self {
        Event::new(EventKind::Clock(ev))
    }
}

impl From<SyncEvent> for Event {
    fn from(ev: SyncEvent) -> Self {
        Event::new(EventKind::Sync(ev))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_shared_across_instances() {
        let a = Event::from(ClockEvent::new(1));
        let b = Event::from(ClockEvent::new(2));
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), Event::from(SyncEvent::new(1, vec![])).id());
    }

    #[test]
    fn test_id_equality_is_by_value() {
        let owned = String::from("ClockEvent");
        let leaked: &'static str = Box::leak(owned.into_boxed_str());
        assert_eq!(EventId::new(leaked), ClockEvent::ID);
    }

    #[test]
    fn test_payload_mismatch() {
        let ev = Event::from(SyncEvent::new(5, vec!["pool.ntp.org".into()]));
        let err = ev.payload::<ClockEvent>().unwrap_err();
        assert_eq!(
            err,
            ListenerError::TypeMismatch {
                expected: ClockEvent::ID,
                actual: SyncEvent::ID,
            }
        );
        assert_eq!(ev.payload::<SyncEvent>().unwrap().servers(), ["pool.ntp.org"]);
    }

    #[test]
    fn test_seq_increases() {
        let a = Event::from(ClockEvent::new(0));
        let b = Event::from(ClockEvent::new(0));
        assert!(b.seq() > a.seq());
    }

    #[test]
    fn test_local_time_applies_offset() {
        let ev = ClockEvent::new(1_700_000_000);
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let t = ev.local_time(est).unwrap();
        // 2023-11-14T22:13:20Z
        assert_eq!(t.format("%H:%M").to_string(), "17:13");
    }
}
