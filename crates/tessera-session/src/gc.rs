//! Background session garbage collection.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::provider::Provider;

/// Shortest period the GC task will tick at.
const MIN_GC_PERIOD: Duration = Duration::from_millis(10);

/// Spawn a task that sweeps `provider` every `max_lifetime`.
///
/// The first sweep runs immediately. The task exits once `shutdown` is
/// cancelled; the returned handle resolves after that.
pub fn spawn_gc_task(
    provider: Arc<dyn Provider>,
    max_lifetime: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(max_lifetime.max(MIN_GC_PERIOD));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Session GC task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = provider.gc(max_lifetime);
                    if removed > 0 {
                        info!(removed = removed, active_sessions = provider.len(), "Session GC completed");
                    } else {
                        debug!(active_sessions = provider.len(), "Session GC: nothing expired");
                    }
                }
            }
        }
    })
}
