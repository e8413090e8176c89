use super::Store;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

/// Start background TTL sweep task.
///
/// Store calls block on disk I/O, so each sweep runs on the blocking pool.
pub fn start_ttl_sweeper(store: Arc<dyn Store>, interval: Duration) -> tokio::task::JoinHandle<()> {
    let interval = interval.max(MIN_SWEEP_INTERVAL);
    info!("Starting TTL sweep task (interval={}ms)", interval.as_millis());

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let store = store.clone();
            match tokio::task::spawn_blocking(move || store.purge_expired()).await {
                Ok(Ok(0)) => {}
                Ok(Ok(count)) => debug!("Purged {} expired keys", count),
                Ok(Err(e)) => warn!("TTL sweep failed: {}", e),
                Err(e) => error!("TTL sweep task aborted: {}", e),
            }
        }
    })
}
