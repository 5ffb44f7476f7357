//! Error types used by the runtime, listeners and collaborators.
//!
//! This module defines three error enums:
//!
//! - [`RuntimeError`] — errors raised while starting or stopping the runtime.
//! - [`ListenerError`] — errors raised by a single listener invocation.
//! - [`BusError`] — errors raised by an I2C bus implementation.
//!
//! All of them provide helper methods (`as_label`, `as_message`) for logging.
//! None of them reaches the queue or the registry: a listener error is confined
//! to the invocation that produced it.

use std::io;

use thiserror::Error;

use crate::events::EventId;

/// # Errors produced by the runtime itself.
///
/// These represent failures of the surrounding machinery (threads, signals),
/// never of the dispatch core.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The driver thread could not be started.
    #[error("failed to spawn driver thread: {0}")]
    DriverSpawn(#[source] io::Error),

    /// The driver thread panicked outside of a listener.
    #[error("driver thread panicked")]
    DriverPanicked,

    /// Registering OS signal handlers failed.
    #[error("failed to listen for shutdown signal: {0}")]
    Signal(#[source] io::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use clockbus::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::DriverPanicked.as_label(), "runtime_driver_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::DriverSpawn(_) => "runtime_driver_spawn",
            RuntimeError::DriverPanicked => "runtime_driver_panicked",
            RuntimeError::Signal(_) => "runtime_signal",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::DriverSpawn(e) => format!("driver spawn: {e}"),
            RuntimeError::DriverPanicked => "driver panicked".to_string(),
            RuntimeError::Signal(e) => format!("signal: {e}"),
        }
    }
}

/// # Errors produced by a listener invocation.
///
/// Returned from [`Listener::on_event`](crate::Listener::on_event). The queue logs
/// them and moves on to the next listener.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// The listener interpreted the event as a different variant than was dispatched.
    #[error("expected {expected} but event is {actual}")]
    TypeMismatch {
        /// Identifier of the variant the listener asked for.
        expected: EventId,
        /// Identifier of the event that was actually delivered.
        actual: EventId,
    },

    /// The listener ran but could not complete its work.
    #[error("listener failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },
}

impl ListenerError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use clockbus::{ClockEvent, ListenerError, Payload, SyncEvent};
    ///
    /// let err = ListenerError::TypeMismatch { expected: ClockEvent::ID, actual: SyncEvent::ID };
    /// assert_eq!(err.as_label(), "listener_type_mismatch");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::TypeMismatch { .. } => "listener_type_mismatch",
            ListenerError::Failed { .. } => "listener_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::TypeMismatch { expected, actual } => {
                format!("type mismatch: expected={expected} actual={actual}")
            }
            ListenerError::Failed { error } => format!("error: {error}"),
        }
    }

    /// Shorthand for [`ListenerError::Failed`].
    pub fn failed(error: impl Into<String>) -> Self {
        ListenerError::Failed {
            error: error.into(),
        }
    }
}

impl From<BusError> for ListenerError {
    fn from(err: BusError) -> Self {
        ListenerError::Failed {
            error: err.as_message(),
        }
    }
}

/// # Errors produced by an I2C bus.
///
/// Owned entirely by the bus implementation; the dispatch core never retries.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Attempted to write an empty frame.
    #[error("empty write")]
    EmptyWrite,

    /// The device did not acknowledge the transfer.
    #[error("device 0x{address:02X} did not acknowledge")]
    Nack {
        /// 7-bit device address.
        address: u8,
    },

    /// Transport-level failure.
    #[error("bus transfer failed: {error}")]
    Transfer {
        /// The underlying error message.
        error: String,
    },
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use clockbus::BusError;
    ///
    /// assert_eq!(BusError::Nack { address: 0x70 }.as_label(), "bus_nack");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::EmptyWrite => "bus_empty_write",
            BusError::Nack { .. } => "bus_nack",
            BusError::Transfer { .. } => "bus_transfer",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BusError::EmptyWrite => "empty write".to_string(),
            BusError::Nack { address } => format!("nack from 0x{address:02X}"),
            BusError::Transfer { error } => format!("transfer: {error}"),
        }
    }
}
