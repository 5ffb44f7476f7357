//! # Event listeners.
//!
//! This module provides the [`Listener`] trait, the closure adapter
//! [`ListenerFn`], and the built-in sinks.
//!
//! ## Architecture
//! ```text
//! Driver thread ── pop() ──► listeners registered for the event id
//!                               │
//!                  ┌────────────┼────────────┐
//!                  ▼            ▼            ▼
//!              LogWriter  DisplayListener  Custom
//!              (tracing)   (HT16K33)      (user logic)
//! ```
//!
//! ## Built-in listeners
//! - [`LogWriter`] writes clock and sync events as `tracing` records
//! - [`DisplayListener`] renders clock events on a [`ClockDisplay`](crate::ClockDisplay)

mod display;
mod listener;
mod listener_fn;
mod log;

pub use display::DisplayListener;
pub use listener::{Listener, ListenerRef};
pub use listener_fn::ListenerFn;
pub use log::LogWriter;
