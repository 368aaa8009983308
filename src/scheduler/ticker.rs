//! Trait abstraction for tick production to enable testing without
//! wall-clock waits

use async_trait::async_trait;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};

/// Produces the control loop's tick instants.
#[async_trait]
pub trait Ticker: Send {
    /// Completes when the next tick is due.
    async fn tick(&mut self);
}

/// Fixed-period wall-clock ticker backed by [`tokio::time::Interval`].
///
/// A tick that runs late (because the previous send was still in flight)
/// delays the following tick instead of bursting to catch up; skipped ticks
/// are never queued.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    /// Creates a ticker with the given period.
    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}


#[cfg(test)]
mod tests {
    use super::manual::manual_ticker;
    use super::*;

    #[tokio::test]
    async fn test_interval_ticker_first_tick_is_immediate() {
        let mut ticker = IntervalTicker::with_period(Duration::from_secs(3600));
        // Must not block for the full period
        tokio::time::timeout(Duration::from_millis(100), ticker.tick())
            .await
            .expect("first tick should complete immediately");
    }

    #[tokio::test]
    async fn test_manual_ticker_fires_on_demand() {
        let (handle, mut ticker) = manual_ticker();
        handle.fire();
        tokio::time::timeout(Duration::from_millis(100), ticker.tick())
            .await
            .expect("fired tick should complete");
    }

    #[tokio::test]
    async fn test_manual_ticker_waits_without_fire() {
        let (_handle, mut ticker) = manual_ticker();
        let result = tokio::time::timeout(Duration::from_millis(50), ticker.tick()).await;
        assert!(result.is_err(), "Unfired ticker must keep waiting");
    }
}
