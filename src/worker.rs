//! Background housekeeping that runs next to the HTTP server.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::state::SharedState;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Periodically drop expired login throttle windows until `shutdown` flips.
pub fn spawn_cleanup(state: SharedState, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!("Cleanup task started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            state.login_limiter.cleanup();
            tracing::trace!(tracked = state.login_limiter.tracked(), "Login limiter cleaned");

            tokio::select! {
                _ = tokio::time::sleep(CLEANUP_INTERVAL) => {}
                _ = shutdown.changed() => {}
            }
        }

        tracing::debug!("Cleanup task stopped");
    })
}
