//! Runtime core: configuration, the driver thread, and process wiring.
//!
//! The dispatch core itself lives in [`events`](crate::events); this module
//! runs it. The public API is [`Runtime`] (built via [`RuntimeBuilder`]),
//! [`Driver`] for callers that manage their own threads, and [`Config`].
//!
//! Internal modules:
//! - [`config`]: settings and sentinel accessors;
//! - [`driver`]: the single-consumer loop on a dedicated OS thread;
//! - [`runtime`]: starts producers and the driver, drives shutdown;
//! - [`builder`]: registers listeners before anything runs;
//! - [`shutdown`]: cross-platform termination signal handling.

mod builder;
mod config;
mod driver;
mod runtime;
mod shutdown;

pub use builder::RuntimeBuilder;
pub use config::{Config, DEFAULT_POLL_INTERVAL, DEFAULT_TICK, I2cConfig};
pub use driver::{DRIVER_THREAD_NAME, Driver};
pub use runtime::Runtime;
pub use shutdown::wait_for_shutdown_signal;
