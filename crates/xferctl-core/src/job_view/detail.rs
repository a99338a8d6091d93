//! Per-URL job detail (`GET /jobdetail`), paginated in memory.

use crate::api::UrlInfo;

use super::{Pager, Throughput};

#[derive(Debug, Clone)]
pub struct JobDetailView {
    entries: Vec<UrlInfo>,
    pager: Pager,
    throughput: Throughput,
}

impl JobDetailView {
    /// Starts on page 1 (page 0 when there are no entries).
    pub fn new(entries: Vec<UrlInfo>, page_size: usize) -> Self {
        let mut pager = Pager::new(page_size);
        pager.reset(entries.len());
        let throughput = Throughput::from_infos(&entries);
        Self {
            entries,
            pager,
            throughput,
        }
    }

    pub fn goto_page(&mut self, page: usize) -> usize {
        self.pager.goto(page)
    }

    pub fn rows(&self) -> &[UrlInfo] {
        &self.entries[self.pager.range()]
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Aggregated over every entry, not just the current page.
    pub fn throughput(&self) -> Throughput {
        self.throughput
    }
}
