//! # Example: clock
//!
//! The full application: the host clock feeds a (recorded) HT16K33 display and
//! the logger sink until Ctrl-C.
//!
//! ## Flow
//! ```text
//! ClockProducer (tokio task, every tick)
//!     └─► dispatch(SyncEvent once, then ClockEvent)
//!           └─► EventQueue ──► driver thread
//!                 ├─► LogWriter        (tracing)
//!                 └─► DisplayListener  ──► Ht16k33Display ──► RecordingBus
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=clockbus=debug cargo run --example clock
//! ```

use std::sync::Arc;

use clockbus::{
    ClockEvent, ClockProducer, Config, DisplayListener, Ht16k33Display, LogWriter, Payload,
    ProducerRef, RecordingBus, Runtime, SyncEvent, SystemClock,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clockbus=info")),
        )
        .init();

    let cfg = Config::default();

    let bus = RecordingBus::new(&cfg.i2c);
    let display = Ht16k33Display::new(bus.clone(), cfg.twelve_hour)?;

    let rt = Runtime::builder(cfg.clone())
        .with_listener(ClockEvent::ID, Arc::new(DisplayListener::new(display, &cfg)))
        .with_listener_for(&[SyncEvent::ID, ClockEvent::ID], Arc::new(LogWriter::new(&cfg)))
        .build();

    let clock = ClockProducer::arc(Arc::new(SystemClock), &cfg);
    let producers: Vec<ProducerRef> = vec![clock as ProducerRef];
    let processed = rt.run(producers).await?;

    println!("processed {processed} events, {} display frames", bus.frames().len());
    Ok(())
}
