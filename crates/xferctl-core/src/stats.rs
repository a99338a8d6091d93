//! Aggregate transfer statistics (`/finishedsize`, `/currentspeed`).

use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::api::{ApiClient, ApiError};

/// Service-wide counters for the caller's keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateStats {
    /// Bytes.
    pub finished_size: i64,
    /// Bytes per second.
    pub upload_speed: i64,
    pub download_speed: i64,
}

/// One blocking round of both stat calls.
pub fn fetch_stats(client: &ApiClient) -> Result<AggregateStats, ApiError> {
    let finished_size = client.finished_size()?;
    let speed = client.current_speed()?;
    Ok(AggregateStats {
        finished_size,
        upload_speed: speed.upload_speed,
        download_speed: speed.download_speed,
    })
}

/// Polls [`fetch_stats`] on a fixed interval.
pub struct StatsPoller {
    client: ApiClient,
    interval: Duration,
}

impl StatsPoller {
    pub fn new(client: ApiClient, interval: Duration) -> Self {
        Self { client, interval }
    }

    pub async fn fetch_once(&self) -> Result<AggregateStats, ApiError> {
        let client = self.client.clone();
        tokio::task::spawn_blocking(move || fetch_stats(&client)).await?
    }

    /// Run until `max_ticks` ticks have completed (forever when `None`).
    ///
    /// The first tick fires immediately. A tick finishes before the next one
    /// starts; failed ticks are handed to `on_tick` and are not retried.
    pub async fn run<F>(&self, max_ticks: Option<u64>, mut on_tick: F)
    where
        F: FnMut(Result<AggregateStats, ApiError>),
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut done = 0u64;
        while max_ticks.map_or(true, |max| done < max) {
            ticker.tick().await;
            let result = self.fetch_once().await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "stats refresh failed");
            }
            on_tick(result);
            done += 1;
        }
    }
}
