//! Background sweeper for abandoned search sessions.
//!
//! Browsers rarely close their sessions explicitly; anything idle for longer
//! than the configured limit is closed on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::search_sessions::SearchSessions;

/// Upper bound on how often the registry is scanned.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Starts the idle-session sweeper.
pub fn start_session_sweeper(
    sessions: Arc<SearchSessions>,
    max_idle: Duration,
) -> tokio::task::JoinHandle<()> {
    let period = sweep_interval(max_idle);
    tokio::spawn(async move {
        info!(
            "Search session sweeper started (idle limit {}s, every {}s)",
            max_idle.as_secs(),
            period.as_secs()
        );

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let closed = sessions.close_idle(max_idle).await;
            if closed > 0 {
                info!("Closed {} idle search session(s)", closed);
            } else {
                debug!("No idle search sessions");
            }
        }
    })
}

fn sweep_interval(max_idle: Duration) -> Duration {
    (max_idle / 2).clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_interval_is_bounded() {
        assert_eq!(sweep_interval(Duration::from_secs(1800)), MAX_SWEEP_INTERVAL);
        assert_eq!(sweep_interval(Duration::from_secs(10)), Duration::from_secs(5));
        assert_eq!(sweep_interval(Duration::ZERO), Duration::from_secs(1));
    }
}
