//! Finished/pending/failed classification of one job.

use std::collections::HashMap;

use crate::api::{JobStatus, JobStatusResponse};

/// Three disjoint URL lists in server order. A URL belongs to exactly one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSnapshot {
    finished: Vec<String>,
    pending: Vec<String>,
    failed: Vec<String>,
}

impl JobSnapshot {
    /// Build from raw lists. A URL listed under more than one status keeps the
    /// first one (finished, then pending, then failed).
    pub fn new(finished: Vec<String>, pending: Vec<String>, failed: Vec<String>) -> Self {
        let mut seen: HashMap<String, JobStatus> = HashMap::new();
        let mut keep = |urls: Vec<String>, status: JobStatus| -> Vec<String> {
            urls.into_iter()
                .filter(|u| match seen.get(u).copied() {
                    Some(prev) if prev != status => {
                        tracing::warn!(url = %u, first = %prev, dropped = %status, "URL reported under two statuses");
                        false
                    }
                    Some(_) => true,
                    None => {
                        seen.insert(u.clone(), status);
                        true
                    }
                })
                .collect()
        };
        let finished = keep(finished, JobStatus::Finished);
        let pending = keep(pending, JobStatus::Pending);
        let failed = keep(failed, JobStatus::Failed);
        Self {
            finished,
            pending,
            failed,
        }
    }

    pub fn urls(&self, status: JobStatus) -> &[String] {
        match status {
            JobStatus::Finished => &self.finished,
            JobStatus::Pending => &self.pending,
            JobStatus::Failed => &self.failed,
        }
    }

    pub fn len(&self) -> usize {
        self.finished.len() + self.pending.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<JobStatusResponse> for JobSnapshot {
    fn from(r: JobStatusResponse) -> Self {
        JobSnapshot::new(
            r.success_files.unwrap_or_default(),
            r.queued_files.unwrap_or_default(),
            r.failed_files.unwrap_or_default(),
        )
    }
}
