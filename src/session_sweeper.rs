// Background worker: purge expired sessions every sweep_interval_secs until shutdown.

use crate::session_repo::SessionRepo;
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::{debug, instrument, warn};

/// Spawns the sweeper. It exits when `shutdown_rx` fires or its sender is dropped.
pub fn spawn(
    sessions: Arc<SessionRepo>,
    sweep_interval_secs: u64,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        run(sessions, sweep_interval_secs, shutdown_rx).await;
    })
}

#[instrument(skip(sessions, shutdown_rx))]
async fn run(
    sessions: Arc<SessionRepo>,
    sweep_interval_secs: u64,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) {
    let mut tick = interval(Duration::from_secs(sweep_interval_secs));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = tick.tick() => {
                match sessions.purge_expired().await {
                    Ok(0) => {}
                    Ok(n) => debug!(removed = n, "expired sessions purged"),
                    Err(e) => warn!(error = %e, "session purge failed"),
                }
            }
            _ = &mut shutdown_rx => break,
        }
    }
    debug!("Session sweeper shutting down");
}
