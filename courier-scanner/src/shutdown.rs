//! Graceful shutdown handling for SIGTERM and SIGINT.
//!
//! Cancellation is observed between files, so the file currently in flight
//! finishes its backup and publish, the connection is closed cleanly, and
//! the partial counts are reported.

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Spawn a task that cancels `token` on the first SIGINT or SIGTERM.
pub fn install_signal_handler(token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if signal::ctrl_c().await.is_err() {
                // No signal handler means no way to interrupt gracefully;
                // leave the token alone and let the scan run to completion.
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(_) => std::future::pending::<()>().await,
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), finishing current file before exit...");
            }
            _ = terminate => {
                info!("Received SIGTERM, finishing current file before exit...");
            }
        }

        token.cancel();
    });
}
