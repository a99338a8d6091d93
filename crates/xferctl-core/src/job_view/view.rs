//! Job status view state: snapshot, filter, page, and merged page rows.

use std::collections::HashMap;

use crate::api::{ApiError, UrlInfo};

use super::{
    display_set, merge_page, unenriched_rows, DisplayItem, DisplayRow, ExportArtifact, JobSnapshot,
    JobSummary, Pager, StatusFilter, Throughput, UrlMetrics,
};

/// A pending enrichment fetch for the URLs of one page.
///
/// Sequence numbers grow with every view change; completing a ticket older
/// than the latest one is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentTicket {
    seq: u64,
    urls: Vec<String>,
}

impl EnrichmentTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// URLs to send, in page order.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Applied { mismatches: usize },
    /// A newer page/filter/snapshot was issued meanwhile; response dropped.
    Stale,
}

#[derive(Debug)]
struct ViewState {
    job_id: Option<String>,
    snapshot: JobSnapshot,
    filter: StatusFilter,
    display: Vec<DisplayItem>,
    pager: Pager,
    summary: JobSummary,
    metrics: HashMap<String, UrlMetrics>,
    rows: Vec<DisplayRow>,
    throughput: Throughput,
    issued_seq: u64,
}

/// Paginated, filterable view over one job's snapshot.
#[derive(Debug)]
pub struct JobStatusView {
    state: ViewState,
}

impl JobStatusView {
    pub fn new(page_size: usize) -> Self {
        Self {
            state: ViewState {
                job_id: None,
                snapshot: JobSnapshot::default(),
                filter: StatusFilter::all(),
                display: Vec::new(),
                pager: Pager::new(page_size),
                summary: JobSummary::default(),
                metrics: HashMap::new(),
                rows: Vec::new(),
                throughput: Throughput::default(),
                issued_seq: 0,
            },
        }
    }

    /// Install a freshly fetched snapshot: filters back to all, page 1, metrics cleared.
    pub fn replace_snapshot(
        &mut self,
        job_id: &str,
        snapshot: JobSnapshot,
    ) -> Option<EnrichmentTicket> {
        let st = &mut self.state;
        st.job_id = Some(job_id.to_string());
        st.summary = JobSummary::from_snapshot(&snapshot);
        st.snapshot = snapshot;
        st.metrics.clear();
        st.filter = StatusFilter::all();
        tracing::debug!(job_id, total = st.summary.total, "snapshot replaced");
        self.rebuild()
    }

    /// Rebuild the display set for `filter` and go back to page 1.
    pub fn set_filter(&mut self, filter: StatusFilter) -> Option<EnrichmentTicket> {
        self.state.filter = filter;
        self.rebuild()
    }

    /// Select page `n`, clamped into `[1, total_pages]`.
    pub fn goto_page(&mut self, n: usize) -> Option<EnrichmentTicket> {
        self.state.pager.goto(n);
        self.refresh_page()
    }

    pub fn next_page(&mut self) -> Option<EnrichmentTicket> {
        self.state.pager.next();
        self.refresh_page()
    }

    pub fn prev_page(&mut self) -> Option<EnrichmentTicket> {
        self.state.pager.prev();
        self.refresh_page()
    }

    /// Re-render the current page from cached metrics and ask for fresh ones.
    /// Returns `None` when the page is empty (nothing to fetch).
    pub fn refresh_page(&mut self) -> Option<EnrichmentTicket> {
        let st = &mut self.state;
        st.issued_seq += 1;
        let page = &st.display[st.pager.range()];
        st.rows = unenriched_rows(page, &st.metrics);
        if page.is_empty() {
            return None;
        }
        Some(EnrichmentTicket {
            seq: st.issued_seq,
            urls: page.iter().map(|i| i.url.clone()).collect(),
        })
    }

    /// Apply the result of a ticket's fetch to the state as it is now.
    ///
    /// Stale tickets are dropped whether they succeeded or failed. A failed
    /// fetch leaves the rows with their previous metrics and returns the error.
    pub fn complete_enrichment(
        &mut self,
        ticket: EnrichmentTicket,
        result: Result<Vec<UrlInfo>, ApiError>,
    ) -> Result<MergeOutcome, ApiError> {
        let st = &mut self.state;
        if ticket.seq < st.issued_seq {
            tracing::debug!(
                ticket = ticket.seq,
                latest = st.issued_seq,
                "dropping stale enrichment response"
            );
            return Ok(MergeOutcome::Stale);
        }
        let response = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "enrichment fetch failed; rows keep previous metrics");
                return Err(e);
            }
        };
        let page = &st.display[st.pager.range()];
        let (rows, mismatches) = merge_page(page, &response, &mut st.metrics);
        st.rows = rows;
        self.recompute_throughput();
        Ok(MergeOutcome::Applied { mismatches })
    }

    /// The filtered set (all pages) as a text artifact.
    pub fn export_visible(&self) -> ExportArtifact {
        let job_id = self.state.job_id.as_deref().unwrap_or_default();
        ExportArtifact::from_items(job_id, &self.state.display)
    }

    pub fn job_id(&self) -> Option<&str> {
        self.state.job_id.as_deref()
    }

    pub fn snapshot(&self) -> &JobSnapshot {
        &self.state.snapshot
    }

    pub fn filter(&self) -> StatusFilter {
        self.state.filter
    }

    pub fn display_set(&self) -> &[DisplayItem] {
        &self.state.display
    }

    /// Rows of the current page.
    pub fn rows(&self) -> &[DisplayRow] {
        &self.state.rows
    }

    pub fn pager(&self) -> &Pager {
        &self.state.pager
    }

    pub fn page_label(&self) -> String {
        self.state.pager.label()
    }

    /// True when the filtered set is empty and the result table should not be shown.
    pub fn is_hidden(&self) -> bool {
        self.state.pager.is_empty()
    }

    pub fn summary(&self) -> JobSummary {
        self.state.summary
    }

    pub fn throughput(&self) -> Throughput {
        self.state.throughput
    }

    fn rebuild(&mut self) -> Option<EnrichmentTicket> {
        let st = &mut self.state;
        st.display = display_set(&st.snapshot, st.filter);
        st.pager.reset(st.display.len());
        self.recompute_throughput();
        self.refresh_page()
    }

    fn recompute_throughput(&mut self) {
        let st = &mut self.state;
        st.throughput =
            Throughput::from_metrics(st.display.iter().filter_map(|i| st.metrics.get(&i.url)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{JobStatus, Metric};
    use crate::job_view::RowStatus;

    fn snap(finished: &[&str], pending: &[&str], failed: &[&str]) -> JobSnapshot {
        let v = |x: &[&str]| x.iter().map(|s| s.to_string()).collect();
        JobSnapshot::new(v(finished), v(pending), v(failed))
    }

    fn info(url: &str, size: i64, speed: i64, pct: i64) -> UrlInfo {
        UrlInfo {
            url: url.into(),
            size: size.into(),
            speed: speed.into(),
            percentage: pct.into(),
            status: None,
        }
    }

    fn urls(view: &JobStatusView) -> Vec<&str> {
        view.display_set().iter().map(|i| i.url.as_str()).collect()
    }

    #[test]
    fn replace_snapshot_resets_filter_and_page() {
        let mut view = JobStatusView::new(2);
        view.replace_snapshot("j0", snap(&["x", "y", "z"], &[], &[]));
        view.set_filter(StatusFilter::new(false, true, true));
        let ticket = view
            .replace_snapshot("j1", snap(&["a", "b"], &["c"], &[]))
            .unwrap();
        assert_eq!(view.filter(), StatusFilter::all());
        assert_eq!(view.pager().page(), 1);
        assert_eq!(view.page_label(), "1 / 2");
        assert_eq!(ticket.urls(), ["a", "b"]);
        assert_eq!(view.summary().total, 3);
        assert_eq!(view.job_id(), Some("j1"));
    }

    #[test]
    fn filter_changes_display_but_not_summary() {
        let mut view = JobStatusView::new(50);
        view.replace_snapshot("j", snap(&["a", "b"], &["c"], &[]));
        assert_eq!(urls(&view), ["a", "b", "c"]);
        view.set_filter(StatusFilter::new(true, false, true));
        assert_eq!(urls(&view), ["a", "b"]);
        assert_eq!(view.summary().pending, 1);
        assert_eq!(view.summary().total, 3);
    }

    #[test]
    fn empty_filter_hides_results() {
        let mut view = JobStatusView::new(5);
        view.replace_snapshot("j", snap(&["a"], &[], &[]));
        assert!(view.set_filter(StatusFilter::new(false, false, false)).is_none());
        assert!(view.is_hidden());
        assert_eq!(view.page_label(), "0 / 0");
        assert!(view.rows().is_empty());
        assert!(view.goto_page(4).is_none());
        assert_eq!(view.pager().page(), 0);
    }

    #[test]
    fn ticket_covers_only_current_page() {
        let mut view = JobStatusView::new(2);
        view.replace_snapshot("j", snap(&["a", "b"], &["c"], &["d", "e"]));
        let t = view.goto_page(2).unwrap();
        assert_eq!(t.urls(), ["c", "d"]);
        let t = view.goto_page(10).unwrap();
        assert_eq!(t.urls(), ["e"]);
        assert_eq!(view.page_label(), "3 / 3");
    }

    #[test]
    fn aligned_enrichment_uses_local_status() {
        let mut view = JobStatusView::new(50);
        let t = view.replace_snapshot("j", snap(&["a", "b"], &[], &[])).unwrap();
        let out = view
            .complete_enrichment(t, Ok(vec![info("a", 10, 0, 100), info("b", 20, 3, 60)]))
            .unwrap();
        assert_eq!(out, MergeOutcome::Applied { mismatches: 0 });
        assert_eq!(view.rows()[0].status, RowStatus::Known(JobStatus::Finished));
        assert_eq!(view.rows()[1].status, RowStatus::Known(JobStatus::Finished));
        assert_eq!(view.throughput().finished_size, 10);
        assert_eq!(view.throughput().upload_speed, 3);
    }

    #[test]
    fn swapped_enrichment_shows_mismatch_marker() {
        let mut view = JobStatusView::new(50);
        let t = view.replace_snapshot("j", snap(&["a", "b"], &[], &[])).unwrap();
        let out = view
            .complete_enrichment(t, Ok(vec![info("b", 1, 1, 1), info("a", 2, 2, 2)]))
            .unwrap();
        assert_eq!(out, MergeOutcome::Applied { mismatches: 2 });
        assert_eq!(view.rows()[0].url, "a");
        assert_eq!(view.rows()[0].status, RowStatus::Mismatch);
        assert_eq!(view.rows()[0].metrics.size, Metric::Unknown);
    }

    #[test]
    fn stale_ticket_does_not_overwrite_newer_page() {
        let mut view = JobStatusView::new(1);
        let first = view.replace_snapshot("j", snap(&["a", "b"], &[], &[])).unwrap();
        let second = view.goto_page(2).unwrap();

        let out = view
            .complete_enrichment(second, Ok(vec![info("b", 5, 0, 100)]))
            .unwrap();
        assert_eq!(out, MergeOutcome::Applied { mismatches: 0 });

        // Page 1's response arrives late.
        let out = view
            .complete_enrichment(first, Ok(vec![info("a", 9, 0, 100)]))
            .unwrap();
        assert_eq!(out, MergeOutcome::Stale);
        assert_eq!(view.rows()[0].url, "b");
        assert_eq!(view.rows()[0].metrics.size, Metric::Known(5));
    }

    #[test]
    fn stale_after_filter_emptied_the_page() {
        let mut view = JobStatusView::new(5);
        let t = view.replace_snapshot("j", snap(&["a"], &[], &[])).unwrap();
        view.set_filter(StatusFilter::new(false, true, true));
        let out = view.complete_enrichment(t, Ok(vec![info("a", 1, 1, 100)])).unwrap();
        assert_eq!(out, MergeOutcome::Stale);
        assert!(view.rows().is_empty());
    }

    #[test]
    fn failed_enrichment_keeps_previous_metrics() {
        let mut view = JobStatusView::new(5);
        let t = view.replace_snapshot("j", snap(&["a"], &[], &[])).unwrap();
        view.complete_enrichment(t, Ok(vec![info("a", 7, 0, 100)]))
            .unwrap();

        let t = view.refresh_page().unwrap();
        assert_eq!(view.rows()[0].metrics.size, Metric::Known(7));
        let err = view
            .complete_enrichment(
                t,
                Err(ApiError::Http {
                    status: 500,
                    body: "Cannot get url detail".into(),
                }),
            )
            .unwrap_err();
        assert_eq!(err.user_message(), "Cannot get url detail");
        assert_eq!(view.rows()[0].metrics.size, Metric::Known(7));
        assert!(view.goto_page(1).is_some());
    }

    #[test]
    fn revisiting_a_page_shows_cached_metrics_before_refetch() {
        let mut view = JobStatusView::new(1);
        let t = view.replace_snapshot("j", snap(&["a"], &["b"], &[])).unwrap();
        view.complete_enrichment(t, Ok(vec![info("a", 3, 0, 100)]))
            .unwrap();
        view.goto_page(2);
        assert_eq!(view.rows()[0].metrics.size, Metric::Unknown);
        view.goto_page(1);
        assert_eq!(view.rows()[0].metrics.size, Metric::Known(3));
    }

    #[test]
    fn throughput_follows_filter() {
        let mut view = JobStatusView::new(50);
        let t = view.replace_snapshot("j", snap(&["a"], &["b"], &[])).unwrap();
        view.complete_enrichment(t, Ok(vec![info("a", 100, 0, 100), info("b", 50, 4, 20)]))
            .unwrap();
        assert_eq!(view.throughput().finished_size, 100);
        assert_eq!(view.throughput().download_speed, 4);

        view.set_filter(StatusFilter::new(false, true, false));
        assert_eq!(view.throughput().finished_size, 0);
        assert_eq!(view.throughput().download_speed, 4);
    }

    #[test]
    fn export_covers_filtered_set_across_pages() {
        let mut view = JobStatusView::new(1);
        view.replace_snapshot("j7", snap(&["a", "b"], &["c"], &[]));
        view.set_filter(StatusFilter::new(true, false, false));
        view.goto_page(2);
        let artifact = view.export_visible();
        assert_eq!(artifact.content, "a\nb");
        assert_eq!(artifact.file_name, "job-j7-urls.txt");

        view.set_filter(StatusFilter::new(false, false, true));
        assert_eq!(view.export_visible().content, "NULL");
    }
}
