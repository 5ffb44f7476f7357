//! # Clock producer.
//!
//! [`ClockProducer`] samples a [`TimeSource`] every tick and dispatches a
//! [`ClockEvent`] while the source is synchronized.
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► wait for tick (cancellable)
//!   ├─► source unsynchronized ──► skip
//!   ├─► first synchronized sample ──► dispatch SyncEvent
//!   └─► dispatch ClockEvent(now)
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::clock::TimeSource;
use crate::core::Config;
use crate::events::{ClockEvent, EventDispatcher, SyncEvent};
use crate::producers::Producer;

/// Periodic producer of clock events.
pub struct ClockProducer {
    source: Arc<dyn TimeSource>,
    tick: Duration,
    servers: Vec<String>,
}

impl ClockProducer {
    /// Creates a producer sampling `source` at the configured tick.
    pub fn new(source: Arc<dyn TimeSource>, cfg: &Config) -> Self {
        Self {
            source,
            tick: cfg.tick(),
            servers: cfg.time_servers.clone(),
        }
    }

    /// Creates the producer and returns it as a shared handle.
    pub fn arc(source: Arc<dyn TimeSource>, cfg: &Config) -> Arc<Self> {
        Arc::new(Self::new(source, cfg))
    }
}

#[async_trait]
impl Producer for ClockProducer {
    fn name(&self) -> &str {
        "clock"
    }

    async fn run(&self, dispatcher: Arc<EventDispatcher>, ctx: CancellationToken) {
        let mut ticker = time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut synced = false;
        let mut waiting_logged = false;

        loop {
            tokio::select! {
                _ = ctx.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if !self.source.is_synchronized() {
                if !waiting_logged {
                    info!("time is not set yet; waiting for synchronization");
                    waiting_logged = true;
                }
                continue;
            }

            let now = self.source.now();
            if !synced {
                synced = true;
                info!(now, servers = ?self.servers, "time synchronized");
                dispatcher.dispatch(SyncEvent::new(now, self.servers.clone()));
            }
            dispatcher.dispatch(ClockEvent::new(now));
        }

        debug!("clock producer stopped");
    }
}
