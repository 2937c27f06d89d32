use std::fmt::Display;
use std::future::Future;
use tracing::{info, warn};

/// Resolve once `signal` fires. If the signal cannot be installed, never resolve.
pub async fn wait_for_shutdown<F, E>(signal: F)
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    if let Err(e) = signal.await {
        warn!("Failed to listen for shutdown signal, running until killed: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received. Exiting...");
}
