//! Dispatch core: event model, work queue and dispatcher.
//!
//! This module groups the event **data model**, the **queue** that buffers
//! dispatched work, and the **dispatcher** that routes events to listeners.
//!
//! ## Contents
//! - [`Event`], [`EventId`], [`Payload`] event model and typed access
//! - [`EventQueue`] FIFO of `(event, listener snapshot)` entries
//! - [`EventDispatcher`] registry of listeners keyed by [`EventId`]
//!
//! ## Quick reference
//! - **Producers**: [`ClockProducer`](crate::ClockProducer), any thread holding
//!   an `Arc<EventDispatcher>`, and listeners themselves (re-entrant dispatch).
//! - **Consumer**: the [`Driver`](crate::Driver) thread, which drains the queue.

mod dispatcher;
mod event;
mod queue;

pub use dispatcher::EventDispatcher;
pub use event::{ClockEvent, Event, EventId, EventKind, Payload, SyncEvent};
pub use queue::{Delivery, EventQueue, ListenerSet};
