//! # Function-backed listener (`ListenerFn`)
//!
//! [`ListenerFn`] wraps a closure `F: Fn(&Event) -> Result<(), ListenerError>`.
//! Any consumer-side state the closure needs is captured by the closure itself
//! (typically an `Arc<Mutex<..>>`).
//!
//! ## Example
//! ```rust
//! use clockbus::{ClockEvent, Event, ListenerError, ListenerFn, ListenerRef};
//!
//! let l: ListenerRef = ListenerFn::arc("ticker", |ev: &Event| -> Result<(), ListenerError> {
//!     let _clock = ev.payload::<ClockEvent>()?;
//!     Ok(())
//! });
//!
//! assert_eq!(l.name(), "ticker");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::ListenerError;
use crate::events::Event;
use crate::listeners::listener::Listener;

/// Function-backed listener implementation.
pub struct ListenerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ListenerFn<F> {
    /// Creates a new function-backed listener.
    ///
    /// Prefer [`ListenerFn::arc`] when you immediately need a
    /// [`ListenerRef`](crate::ListenerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> fmt::Debug for ListenerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerFn").field("name", &self.name).finish()
    }
}

impl<F> Listener for ListenerFn<F>
where
    F: Fn(&Event) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event) -> Result<(), ListenerError> {
        (self.f)(event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
