//! `xferctl stats` – aggregate finished size and speeds.

use anyhow::Result;
use xferctl_core::api::{ApiClient, ApiError};
use xferctl_core::config::ConsoleConfig;
use xferctl_core::stats::{AggregateStats, StatsPoller};

use super::{render, surface};

pub async fn run_stats(
    client: &ApiClient,
    cfg: &ConsoleConfig,
    watch: bool,
    count: Option<u64>,
) -> Result<()> {
    let poller = StatsPoller::new(client.clone(), cfg.stats_interval());

    if !watch && count.is_none() {
        let stats = poller.fetch_once().await.map_err(surface)?;
        render::stats(&stats);
        return Ok(());
    }

    let on_tick = |result: Result<AggregateStats, ApiError>| match result {
        Ok(stats) => render::stats(&stats),
        Err(err) => eprintln!("stats refresh failed: {:#}", surface(err)),
    };
    tokio::select! {
        _ = poller.run(count, on_tick) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("stats watch interrupted");
        }
    }
    Ok(())
}
