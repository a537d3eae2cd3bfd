//! Graceful shutdown coordinator.
//!
//! Listens for SIGINT (Ctrl+C), SIGTERM, and SIGHUP, then cancels a
//! [`tokio_util::sync::CancellationToken`] so the scheduler can finish the
//! cycle in flight before exiting. A second signal force-exits.

use tokio_util::sync::CancellationToken;

/// Install signal handlers and return a [`CancellationToken`] that is
/// cancelled on the first SIGINT / SIGTERM / SIGHUP. A second signal
/// force-exits the process.
pub(crate) fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();

    let handler_token = token.clone();
    tokio::spawn(async move {
        // Listeners are created once and reused; re-registering per signal
        // can drop a signal delivered in between.
        #[cfg(unix)]
        let (mut sigterm, mut sighup) = {
            use tokio::signal::unix::{signal, SignalKind};
            (
                signal(SignalKind::terminate()).expect("failed to register SIGTERM handler"),
                signal(SignalKind::hangup()).expect("failed to register SIGHUP handler"),
            )
        };

        loop {
            #[cfg(unix)]
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
                _ = sighup.recv() => {}
            }

            #[cfg(not(unix))]
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }

            // The token doubles as the signal count: cancelled means this
            // is at least the second one.
            if handler_token.is_cancelled() {
                tracing::warn!("Force exit requested");
                std::process::exit(130);
            }
            tracing::info!("Received shutdown signal, finishing the current cycle...");
            tracing::info!("Press Ctrl+C again to force exit");
            handler_token.cancel();
        }
    });

    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_uncancelled() {
        assert!(!CancellationToken::new().is_cancelled());
    }

    #[test]
    fn child_observes_parent_cancel() {
        let parent = CancellationToken::new();
        let child = parent.child_token();
        parent.cancel();
        assert!(child.is_cancelled());
    }

    /// The installer must hand back a live token; actual signal delivery
    /// can't be exercised safely inside a shared test binary.
    #[tokio::test]
    async fn install_returns_live_token() {
        let token = install_signal_handler();
        assert!(!token.is_cancelled());
    }
}
