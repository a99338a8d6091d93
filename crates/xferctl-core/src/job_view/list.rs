//! The caller's jobs (`GET /joblist`), paginated in memory.

use crate::api::JobListEntry;

use super::Pager;

#[derive(Debug, Clone)]
pub struct JobListView {
    jobs: Vec<JobListEntry>,
    pager: Pager,
}

impl JobListView {
    pub fn new(jobs: Vec<JobListEntry>, page_size: usize) -> Self {
        let mut pager = Pager::new(page_size);
        pager.reset(jobs.len());
        Self { jobs, pager }
    }

    pub fn goto_page(&mut self, page: usize) -> usize {
        self.pager.goto(page)
    }

    pub fn rows(&self) -> &[JobListEntry] {
        &self.jobs[self.pager.range()]
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
