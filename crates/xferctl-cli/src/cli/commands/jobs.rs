//! `xferctl jobs` – list jobs for the configured keys.

use anyhow::Result;
use chrono::{DateTime, NaiveDate};
use xferctl_core::api::{ApiClient, JobListQuery, StatusMask};
use xferctl_core::config::ConsoleConfig;
use xferctl_core::job_view::JobListView;

use super::{blocking, render};

/// Parsed `jobs` flags.
#[derive(Debug, Clone, Default)]
pub struct JobsArgs {
    pub since: Option<i64>,
    pub until: Option<i64>,
    pub status: Vec<StatusMask>,
    pub job_id: Option<String>,
    pub page: usize,
}

impl JobsArgs {
    fn query(&self) -> JobListQuery {
        JobListQuery {
            since: self.since,
            until: self.until,
            status: self
                .status
                .iter()
                .fold(StatusMask::default(), |acc, s| acc | *s),
            job_id: self.job_id.clone(),
        }
    }
}

/// Unix seconds, RFC 3339, or `YYYY-MM-DD` (midnight UTC).
pub fn parse_time(s: &str) -> Result<i64, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<i64>() {
        return Ok(secs);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| format!("invalid time {s:?} (use unix seconds, RFC 3339 or YYYY-MM-DD)"))
}

pub fn parse_status_mask(s: &str) -> Result<StatusMask, String> {
    StatusMask::from_name(s)
        .ok_or_else(|| format!("unknown status {s:?} (finished, pending, failed, scheduled)"))
}

pub async fn run_jobs(client: &ApiClient, cfg: &ConsoleConfig, args: JobsArgs) -> Result<()> {
    let query = args.query();
    tracing::debug!(?query, "listing jobs");
    let entries = blocking(client, move |c| c.job_list(&query)).await?;
    let mut view = JobListView::new(entries, cfg.page_size);
    view.goto_page(args.page);
    render::job_list(&view);
    Ok(())
}
