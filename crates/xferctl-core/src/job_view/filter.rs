//! Status filter and the filtered display set.

use crate::api::JobStatus;

use super::JobSnapshot;

/// Which categories are shown. Defaults to all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFilter {
    pub finished: bool,
    pub pending: bool,
    pub failed: bool,
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl StatusFilter {
    pub fn new(finished: bool, pending: bool, failed: bool) -> Self {
        Self {
            finished,
            pending,
            failed,
        }
    }

    pub fn all() -> Self {
        Self::new(true, true, true)
    }

    pub fn allows(&self, status: JobStatus) -> bool {
        match status {
            JobStatus::Finished => self.finished,
            JobStatus::Pending => self.pending,
            JobStatus::Failed => self.failed,
        }
    }
}

/// One URL of the display set with its locally known status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub url: String,
    pub status: JobStatus,
}

const ORDER: [JobStatus; 3] = [JobStatus::Finished, JobStatus::Pending, JobStatus::Failed];

/// Finished, then pending, then failed, each in snapshot order; disabled categories omitted.
pub fn display_set(snapshot: &JobSnapshot, filter: StatusFilter) -> Vec<DisplayItem> {
    ORDER
        .iter()
        .filter(|status| filter.allows(**status))
        .flat_map(|&status| {
            snapshot.urls(status).iter().map(move |url| DisplayItem {
                url: url.clone(),
                status,
            })
        })
        .collect()
}
