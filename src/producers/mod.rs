//! # Event producers.
//!
//! This module provides the [`Producer`] trait and the built-in
//! [`ClockProducer`].
//!
//! Producers run as tokio tasks next to each other; each one only ever calls
//! [`EventDispatcher::dispatch`](crate::EventDispatcher::dispatch). The driver
//! thread, not the producer, runs the listeners.

mod clock;
mod producer;

pub use clock::ClockProducer;
pub use producer::{Producer, ProducerRef};
