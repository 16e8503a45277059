//! Periodic removal of expired sessions.
//!
//! Validation deletes an expired session when it happens to see one, but
//! sessions that are never presented again would otherwise sit in the
//! store forever. The scheduler sweeps them on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, warn};

use crate::{Adapter, SessionManager};

/// Runs one sweep, logging instead of returning adapter failures.
pub async fn run_cleanup<A: Adapter, S, U>(manager: &SessionManager<A, S, U>) {
    if let Err(err) = manager.delete_expired_sessions().await {
        error!(error = %err, "failed to delete expired sessions");
    }
}

/// Shortest sweep interval; a zero interval is raised to this.
pub const MIN_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);

/// Spawns a task that sweeps expired sessions every `every`.
///
/// The first sweep runs immediately. A failed sweep is logged and the
/// next one runs on schedule. Abort the returned handle to stop it.
/// A zero `every` is replaced by [`MIN_CLEANUP_INTERVAL`].
pub fn spawn_cleanup_scheduler<A, S, U>(
    manager: Arc<SessionManager<A, S, U>>,
    every: Duration,
) -> JoinHandle<()>
where
    A: Adapter,
    S: Send + Sync + 'static,
    U: Send + Sync + 'static,
{
    let every = if every.is_zero() {
        warn!(
            interval = ?MIN_CLEANUP_INTERVAL,
            "zero cleanup interval, using the minimum"
        );
        MIN_CLEANUP_INTERVAL
    } else {
        every
    };

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            run_cleanup(&manager).await;
        }
    })
}
