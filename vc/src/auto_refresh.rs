//! Periodic refresh timer
//!
//! Lives outside the coordinator and speaks only signals: on every tick it
//! sends `RefreshRequested` for each configured view. The timer stops on its
//! own once the coordinator's inbox closes.

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::AutoRefreshConfig;
use crate::coordinator::SignalSender;

/// Spawn the refresh timer if auto refresh is enabled
///
/// Returns None when disabled or when no views are configured. The task
/// yields the number of ticks it completed.
pub fn spawn(config: &AutoRefreshConfig, sender: SignalSender) -> Option<JoinHandle<u64>> {
    if !config.enabled {
        debug!("auto_refresh::spawn: disabled");
        return None;
    }
    if config.views.is_empty() {
        debug!("auto_refresh::spawn: enabled but no views configured");
        return None;
    }

    let views = config.views.clone();
    let period = config.interval();
    info!(?period, views = views.len(), "auto_refresh: starting timer");

    Some(tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately; the page was just rendered
        interval.tick().await;

        let mut ticks = 0;
        loop {
            interval.tick().await;
            for view_id in &views {
                if sender.refresh_requested(view_id).await.is_err() {
                    debug!(ticks, "auto_refresh: inbox closed, stopping timer");
                    return ticks;
                }
            }
            ticks += 1;
        }
    }))
}
