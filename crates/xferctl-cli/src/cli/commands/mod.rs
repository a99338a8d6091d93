//! CLI command handlers, one file per command group.

mod completions;
mod configure;
mod control;
mod detail;
mod export;
mod jobs;
mod render;
mod schedule;
mod stats;
mod status;
mod submit;

pub use completions::{run_completions, run_man};
pub use configure::run_configure;
pub use control::{run_resume, run_suspend};
pub use detail::run_detail;
pub use export::run_export;
pub use jobs::{parse_status_mask, parse_time, run_jobs, JobsArgs};
pub use schedule::run_schedule;
pub use stats::run_stats;
pub use status::run_status;
pub use submit::run_submit;

use anyhow::{Context, Result};
use xferctl_core::api::{ApiClient, ApiError};

/// Turn an API error into what the user sees: the raw body for rejected
/// requests, the error text otherwise.
pub(crate) fn surface(err: ApiError) -> anyhow::Error {
    tracing::debug!(class = ?err.class(), error = %err, "command failed");
    match err {
        ApiError::Http { .. } => anyhow::anyhow!(err.user_message()),
        other => other.into(),
    }
}

/// Run a blocking API call off the async runtime.
pub(crate) async fn blocking<T, F>(client: &ApiClient, call: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&ApiClient) -> Result<T, ApiError> + Send + 'static,
{
    let client = client.clone();
    tokio::task::spawn_blocking(move || call(&client))
        .await
        .context("api call task failed")?
        .map_err(surface)
}
