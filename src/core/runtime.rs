//! # Runtime: starts producers and the driver, then drives shutdown.
//!
//! The [`Runtime`] owns the queue and the dispatcher. Running it spawns the
//! single driver thread and one tokio task per [`Producer`](crate::Producer),
//! and keeps them alive until cancellation.
//!
//! ## High-level architecture
//! ```text
//! Inputs to run():
//!   Vec<ProducerRef>  ──►  Runtime::run_until(producers, token)
//!
//! Start:
//!   Driver::spawn(driver_token) ──► OS thread "clockbus-driver" (drain, sleep, repeat)
//!   producer[0] .. producer[N-1] ──► JoinSet (child token each)
//!
//! Event flow:
//!   producer ── dispatch(ev) ──► EventDispatcher ──► EventQueue ──► driver ──► listeners
//!
//! Shutdown path:
//!   token cancelled (signal in run(), caller in run_until())
//!     └─► producers observe child token, return; JoinSet drained
//!     └─► driver token cancelled ──► final pass over queued entries; thread joined
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use clockbus::{ClockEvent, Config, Event, ListenerError, ListenerFn, Payload, Runtime};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rt = Runtime::builder(Config::default())
//!         .with_listener(
//!             ClockEvent::ID,
//!             ListenerFn::arc("print", |ev: &Event| -> Result<(), ListenerError> {
//!                 println!("{}", ev.payload::<ClockEvent>()?.timestamp());
//!                 Ok(())
//!             }),
//!         )
//!         .build();
//!
//!     rt.dispatcher().dispatch(ClockEvent::new(1_700_000_000));
//!
//!     let token = CancellationToken::new();
//!     token.cancel();
//!     let processed = rt.run_until(Vec::new(), token).await?;
//!     assert_eq!(processed, 1);
//!     Ok(())
//! }
//! ```

use std::io;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::core::{Config, Driver, RuntimeBuilder, shutdown};
use crate::error::RuntimeError;
use crate::events::{EventDispatcher, EventQueue};
use crate::producers::ProducerRef;

/// Owns the dispatch core and runs it.
pub struct Runtime {
    /// Global runtime configuration.
    pub cfg: Config,
    queue: Arc<EventQueue>,
    dispatcher: Arc<EventDispatcher>,
}

impl Runtime {
    /// Returns a builder for registering listeners before the runtime starts.
    pub fn builder(cfg: Config) -> RuntimeBuilder {
        RuntimeBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        queue: Arc<EventQueue>,
        dispatcher: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            cfg,
            queue,
            dispatcher,
        }
    }

    /// Dispatcher shared with producers; listeners may also be added after start.
    #[inline]
    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }

    #[inline]
    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    /// Runs until the process receives a termination signal.
    ///
    /// Returns the number of queue entries the driver processed.
    pub async fn run(&self, producers: Vec<ProducerRef>) -> Result<u64, RuntimeError> {
        let token = CancellationToken::new();
        let watcher = {
            let token = token.clone();
            tokio::spawn(async move {
                let res = shutdown::wait_for_shutdown_signal().await;
                match &res {
                    Ok(()) => info!("shutdown requested"),
                    Err(e) => error!(error = %e, "failed to install signal handlers"),
                }
                token.cancel();
                res
            })
        };

        let processed = match self.run_until(producers, token).await {
            Ok(processed) => processed,
            Err(e) => {
                watcher.abort();
                return Err(e);
            }
        };
        match watcher.await {
            Ok(Ok(())) => Ok(processed),
            Ok(Err(e)) => Err(RuntimeError::Signal(e)),
            Err(e) => Err(RuntimeError::Signal(io::Error::other(e.to_string()))),
        }
    }

    /// Runs until `token` is cancelled.
    ///
    /// Producers get child tokens. The driver has its own token, cancelled
    /// only after every producer has returned, so its final pass sees
    /// everything they dispatched.
    pub async fn run_until(
        &self,
        producers: Vec<ProducerRef>,
        token: CancellationToken,
    ) -> Result<u64, RuntimeError> {
        let driver_token = CancellationToken::new();
        let driver = Driver::new(Arc::clone(&self.queue), &self.cfg)
            .spawn(driver_token.clone())
            .map_err(RuntimeError::DriverSpawn)?;

        let mut set = JoinSet::new();
        self.spawn_producers(&mut set, &token, producers);

        token.cancelled().await;
        while let Some(res) = set.join_next().await {
            if let Err(e) = res {
                error!(error = %e, "producer task failed");
            }
        }
        driver_token.cancel();

        match tokio::task::spawn_blocking(move || driver.join()).await {
            Ok(Ok(processed)) => Ok(processed),
            _ => Err(RuntimeError::DriverPanicked),
        }
    }

    /// Spawns every producer on the tokio runtime with its own child token.
    fn spawn_producers(
        &self,
        set: &mut JoinSet<()>,
        token: &CancellationToken,
        producers: Vec<ProducerRef>,
    ) {
        for producer in producers {
            info!(producer = producer.name(), "starting producer");
            let dispatcher = Arc::clone(&self.dispatcher);
            let child = token.child_token();
            set.spawn(async move { producer.run(dispatcher, child).await });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::events::{ClockEvent, Event, Payload};
    use crate::listeners::ListenerFn;
    use crate::producers::Producer;

    struct Burst(i64);

    #[async_trait]
    impl Producer for Burst {
        fn name(&self) -> &str {
            "burst"
        }

        async fn run(&self, dispatcher: Arc<EventDispatcher>, _ctx: CancellationToken) {
            for t in 0..self.0 {
                dispatcher.dispatch(ClockEvent::new(t));
            }
        }
    }

    /// Dispatches one last event after it is told to stop.
    struct Farewell;

    #[async_trait]
    impl Producer for Farewell {
        fn name(&self) -> &str {
            "farewell"
        }

        async fn run(&self, dispatcher: Arc<EventDispatcher>, ctx: CancellationToken) {
            ctx.cancelled().await;
            tokio::time::sleep(Duration::from_millis(20)).await;
            dispatcher.dispatch(ClockEvent::new(7));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_driver_outlives_producers_on_shutdown() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let rt = Runtime::builder(Config::default())
            .with_listener(
                ClockEvent::ID,
                ListenerFn::arc("collect", move |ev: &Event| -> Result<(), crate::ListenerError> {
                    sink.lock().push(ev.payload::<ClockEvent>()?.timestamp());
                    Ok(())
                }),
            )
            .build();

        let token = CancellationToken::new();
        token.cancel();
        let processed = rt
            .run_until(vec![Arc::new(Farewell) as ProducerRef], token)
            .await
            .unwrap();

        assert_eq!(processed, 1);
        assert_eq!(*seen.lock(), [7]);
        assert!(rt.queue().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_until_delivers_everything_produced() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let rt = Runtime::builder(Config {
            poll_interval: Duration::from_millis(1),
            ..Config::default()
        })
        .with_listener(
            ClockEvent::ID,
            ListenerFn::arc("collect", move |ev: &Event| -> Result<(), crate::ListenerError> {
                sink.lock().push(ev.payload::<ClockEvent>()?.timestamp());
                Ok(())
            }),
        )
        .build();

        let token = CancellationToken::new();
        let stopper = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                token.cancel();
            })
        };

        let processed = rt.run_until(vec![Arc::new(Burst(10)) as ProducerRef], token).await.unwrap();
        stopper.await.unwrap();

        assert_eq!(processed, 10);
        assert_eq!(*seen.lock(), (0..10).collect::<Vec<_>>());
        assert!(rt.queue().is_empty());
    }
}
