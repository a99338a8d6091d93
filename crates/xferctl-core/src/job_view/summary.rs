//! Job counters and throughput derived from snapshot and metrics.

use crate::api::{JobStatus, UrlInfo};

use super::{JobSnapshot, UrlMetrics};

/// Per-status counts of a snapshot, independent of filter and page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobSummary {
    pub total: usize,
    pub finished: usize,
    pub pending: usize,
    pub failed: usize,
}

impl JobSummary {
    pub fn from_snapshot(snapshot: &JobSnapshot) -> Self {
        let finished = snapshot.urls(JobStatus::Finished).len();
        let pending = snapshot.urls(JobStatus::Pending).len();
        let failed = snapshot.urls(JobStatus::Failed).len();
        Self {
            total: finished + pending + failed,
            finished,
            pending,
            failed,
        }
    }
}

/// Aggregate speed and completed bytes.
///
/// A URL at 100% adds its size to `finished_size`; above 50% its speed counts
/// as upload, above 0% as download. Unknown metrics add nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Throughput {
    pub upload_speed: i64,
    pub download_speed: i64,
    pub finished_size: i64,
}

impl Throughput {
    pub fn add(&mut self, m: &UrlMetrics) {
        let Some(pct) = m.percentage.value() else {
            return;
        };
        // Values come from the service; saturate instead of overflowing.
        if pct == 100 {
            self.finished_size = self.finished_size.saturating_add(m.size.value().unwrap_or(0));
        } else if pct > 50 {
            self.upload_speed = self.upload_speed.saturating_add(m.speed.value().unwrap_or(0));
        } else if pct > 0 {
            self.download_speed = self.download_speed.saturating_add(m.speed.value().unwrap_or(0));
        }
    }

    pub fn from_metrics<'a>(metrics: impl IntoIterator<Item = &'a UrlMetrics>) -> Self {
        let mut t = Self::default();
        for m in metrics {
            t.add(m);
        }
        t
    }

    pub fn from_infos<'a>(infos: impl IntoIterator<Item = &'a UrlInfo>) -> Self {
        let mut t = Self::default();
        for info in infos {
            t.add(&UrlMetrics::from(info));
        }
        t
    }
}
