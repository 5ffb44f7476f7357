//! # clockbus
//!
//! **clockbus** is an in-process publish/subscribe event bus for small,
//! clock-driven applications.
//!
//! Producers (a clock source, any worker thread) hand events to a dispatcher;
//! one dedicated driver thread runs every listener. The dispatch core is a
//! thread-safe registry of listeners keyed by event id plus a thread-safe FIFO
//! of pending work.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ClockProducer │   │  Producer 2  │   │ any thread / │
//!     │ (tokio task) │   │ (tokio task) │   │   listener   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            └───────────── dispatch(ev) ──────────┘
//!                               ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventDispatcher                     (registry lock)              │
//! │  EventId ──► Arc<[ListenerRef]>      snapshot taken at dispatch   │
//! └───────────────────────────────┬───────────────────────────────────┘
//!                                 ▼ push(ev, snapshot)
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventQueue                          (queue lock, unbounded FIFO) │
//! └───────────────────────────────┬───────────────────────────────────┘
//!                                 ▼ pop(): lock, take head, unlock
//!                    ┌─────────────────────────┐
//!                    │ Driver (one OS thread)  │
//!                    └───┬────────────────┬────┘
//!                        ▼                ▼
//!                    LogWriter     DisplayListener ──► Ht16k33Display ──► I2cBus
//! ```
//!
//! ### Rules
//! - Listeners for one id run in registration order, on the driver thread.
//! - No lock is held while a listener runs; listeners may `dispatch` and `listen`.
//! - A listener that fails (`Err` or panic) affects only its own invocation.
//! - Dispatching an id with no listeners drops the event silently.
//!
//! ## Features
//! | Area          | Description                                              | Key types                                  |
//! |---------------|----------------------------------------------------------|--------------------------------------------|
//! | **Events**    | Closed event model with checked typed access             | [`Event`], [`EventId`], [`Payload`]        |
//! | **Dispatch**  | Registry, work queue, single-consumer driver             | [`EventDispatcher`], [`EventQueue`], [`Driver`] |
//! | **Listeners** | Callbacks, closure adapter, built-in sinks               | [`Listener`], [`ListenerFn`], [`LogWriter`], [`DisplayListener`] |
//! | **Producers** | Async, cancelable event sources                          | [`Producer`], [`ClockProducer`]            |
//! | **Clock**     | Time sources, HT16K33 display, I2C boundary              | [`TimeSource`], [`Ht16k33Display`], [`I2cBus`] |
//! | **Runtime**   | Wiring, shutdown, configuration                          | [`Runtime`], [`Config`]                    |
//! | **Errors**    | Typed errors for listeners, bus and runtime              | [`ListenerError`], [`BusError`], [`RuntimeError`] |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use clockbus::{ClockEvent, Event, EventDispatcher, EventQueue, ListenerError, Payload};
//!
//! let queue = Arc::new(EventQueue::new());
//! let dispatcher = EventDispatcher::new(Arc::clone(&queue));
//!
//! dispatcher.listen_fn(ClockEvent::ID, "printer", |ev: &Event| -> Result<(), ListenerError> {
//!     println!("now = {}", ev.payload::<ClockEvent>()?.timestamp());
//!     Ok(())
//! });
//!
//! dispatcher.dispatch(ClockEvent::new(1_700_000_000));
//! assert_eq!(queue.size(), 1);
//!
//! // Normally done by the driver thread.
//! let delivery = queue.pop().unwrap();
//! assert_eq!(delivery.invoked, 1);
//! assert_eq!(queue.size(), 0);
//! ```

mod clock;
mod core;
mod error;
mod events;
mod listeners;
mod producers;

// ---- Public re-exports ----

pub use clock::{
    ClockDisplay, Ht16k33Display, I2cBus, MAX_BRIGHTNESS, MIN_SYNCED_YEAR, ManualClock,
    RecordingBus, SystemClock, TimeSource, looks_synchronized,
};
pub use crate::core::{
    Config, DEFAULT_POLL_INTERVAL, DEFAULT_TICK, DRIVER_THREAD_NAME, Driver, I2cConfig, Runtime,
    RuntimeBuilder, wait_for_shutdown_signal,
};
pub use error::{BusError, ListenerError, RuntimeError};
pub use events::{
    ClockEvent, Delivery, Event, EventDispatcher, EventId, EventKind, EventQueue, ListenerSet,
    Payload, SyncEvent,
};
pub use listeners::{DisplayListener, Listener, ListenerFn, ListenerRef, LogWriter};
pub use producers::{ClockProducer, Producer, ProducerRef};
