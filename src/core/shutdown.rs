//! # Shutdown trigger for [`Runtime::run`](crate::Runtime::run).
//!
//! [`wait_for_shutdown_signal`] is the only thing that ends a signal-driven
//! run. When it completes, the runtime cancels its token and shutdown proceeds
//! in a fixed order:
//!
//! ```text
//! signal ──► token.cancel()
//!              ├─► ClockProducer leaves its tick loop (child token)
//!              ├─► JoinSet joined: no more dispatches from producers
//!              └─► driver token cancelled ──► last pass over the queue ──► thread joined
//! ```
//!
//! If handler installation fails the future resolves with the error instead;
//! the runtime still stops and reports it as
//! [`RuntimeError::Signal`](crate::RuntimeError::Signal).
//!
//! Unix listens for `SIGINT`, `SIGTERM` and `SIGQUIT` (the signals a service
//! manager or a terminal sends to the clock process); other targets use Ctrl-C.

/// Resolves on the first termination signal, or with the installation error.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = interrupt.recv() => {},
        _ = terminate.recv() => {},
        _ = quit.recv() => {},
    }
    Ok(())
}

/// Resolves on Ctrl-C, or with the installation error.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_stays_pending_without_a_signal() {
        let res = tokio::time::timeout(Duration::from_millis(50), wait_for_shutdown_signal()).await;
        assert!(res.is_err(), "resolved without a signal: {res:?}");
    }
}
