//! Periodic sweep of expired typing records

use std::sync::Arc;
use std::time::Duration;

use chat_service::{PresenceService, ServiceContext};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::handlers::now_ms;

/// Run one sweep pass. Failures are logged and reported as zero removed;
/// the next pass retries.
pub async fn sweep_once(ctx: &ServiceContext, now_ms: i64, retention_window_ms: i64) -> u64 {
    match PresenceService::new(ctx)
        .sweep_expired(now_ms, retention_window_ms)
        .await
    {
        Ok(removed) => removed,
        Err(e) => {
            warn!(error = %e, "Typing sweep failed; will retry on next tick");
            0
        }
    }
}

/// Spawn the background sweeper. The first pass runs immediately.
pub fn spawn_sweeper(ctx: Arc<ServiceContext>, period: Duration) -> JoinHandle<()> {
    let retention = ctx.presence_config().retention_window_ms;

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let removed = sweep_once(&ctx, now_ms(), retention).await;
            debug!(removed, "Sweep pass finished");
        }
    })
}
