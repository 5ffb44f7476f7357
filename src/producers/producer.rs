//! # Producer abstraction.
//!
//! A [`Producer`] has a stable [`name`](Producer::name) and an async
//! [`run`](Producer::run) method that receives the dispatcher and a
//! [`CancellationToken`]. Implementors should exit promptly once the token is
//! cancelled.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::events::EventDispatcher;

/// Shared handle to a producer (`Arc<dyn Producer>`).
pub type ProducerRef = Arc<dyn Producer>;

/// # Asynchronous, cancelable event source.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use clockbus::{ClockEvent, EventDispatcher, Producer};
///
/// struct Once;
///
/// #[async_trait]
/// impl Producer for Once {
///     fn name(&self) -> &str { "once" }
///
///     async fn run(&self, dispatcher: Arc<EventDispatcher>, _ctx: CancellationToken) {
///         dispatcher.dispatch(ClockEvent::new(0));
///     }
/// }
/// ```
#[async_trait]
pub trait Producer: Send + Sync + 'static {
    /// Returns a stable, human-readable producer name.
    fn name(&self) -> &str;

    /// Produces events until completion or cancellation.
    async fn run(&self, dispatcher: Arc<EventDispatcher>, ctx: CancellationToken);
}
