//! # Listener trait.
//!
//! Provides [`Listener`], the extension point for plugging handlers into the
//! dispatcher. A listener is registered against one [`EventId`](crate::EventId)
//! and is invoked by the single driver thread for every matching event.
//!
//! ## Rules
//! - Invocations are synchronous and run on the driver thread, in registration order.
//! - A slow listener delays every later queue entry (single consumer).
//! - Returning `Err` or panicking affects only this invocation; the next listener
//!   still runs and the event is still dropped afterwards.
//! - A listener may call [`EventDispatcher::dispatch`](crate::EventDispatcher::dispatch)
//!   or [`EventDispatcher::listen`](crate::EventDispatcher::listen) from inside
//!   `on_event`; no dispatch-core lock is held while it runs.
//!
//! ## Example
//! ```rust
//! use clockbus::{ClockEvent, Event, Listener, ListenerError};
//!
//! struct Printer;
//!
//! impl Listener for Printer {
//!     fn on_event(&self, ev: &Event) -> Result<(), ListenerError> {
//!         let clock = ev.payload::<ClockEvent>()?;
//!         println!("tick {}", clock.timestamp());
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str { "printer" }
//! }
//! ```

use std::sync::Arc;

use crate::error::ListenerError;
use crate::events::Event;

/// Shared handle to a listener (`Arc<dyn Listener>`).
pub type ListenerRef = Arc<dyn Listener>;

/// Callback invoked for each dispatched event of the type it is registered under.
pub trait Listener: Send + Sync + 'static {
    /// Handles a single event.
    ///
    /// Called from the driver thread, never from the producer.
    fn on_event(&self, event: &Event) -> Result<(), ListenerError>;

    /// Human-readable name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
