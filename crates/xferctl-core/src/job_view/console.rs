//! Drives a [`JobStatusView`] against the live API.
//!
//! curl calls are blocking and run in `spawn_blocking`. The view is mutated
//! only between awaits, and every fetched response is applied to the view as
//! it is when the response arrives.

use std::future::Future;

use crate::api::{require_job_id, ApiClient, ApiError, UrlInfo};

use super::{EnrichmentTicket, ExportArtifact, JobSnapshot, JobStatusView, MergeOutcome, StatusFilter};

/// What happened to the page metrics after a view operation.
#[derive(Debug)]
pub enum EnrichmentOutcome {
    /// Nothing to fetch (empty page).
    Skipped,
    Merged { mismatches: usize },
    Stale,
    /// Rows kept their previous metrics.
    Failed(ApiError),
}

pub struct JobConsole {
    client: ApiClient,
    view: JobStatusView,
}

impl JobConsole {
    pub fn new(client: ApiClient, page_size: usize) -> Self {
        Self {
            client,
            view: JobStatusView::new(page_size),
        }
    }

    pub fn view(&self) -> &JobStatusView {
        &self.view
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetch the snapshot for `job_id` and show page 1 with all filters on.
    /// On failure the current view is left untouched.
    pub async fn query_job(&mut self, job_id: &str) -> Result<EnrichmentOutcome, ApiError> {
        let (id, snapshot) = self.load_snapshot(job_id).await?;
        let ticket = self.view.replace_snapshot(&id, snapshot);
        Ok(self.enrich(ticket).await)
    }

    /// Query, filter and select a page, fetching metrics only for the final page.
    pub async fn open(
        &mut self,
        job_id: &str,
        filter: StatusFilter,
        page: usize,
    ) -> Result<EnrichmentOutcome, ApiError> {
        let (id, snapshot) = self.load_snapshot(job_id).await?;
        self.view.replace_snapshot(&id, snapshot);
        if filter != StatusFilter::all() {
            self.view.set_filter(filter);
        }
        let ticket = self.view.goto_page(page);
        Ok(self.enrich(ticket).await)
    }

    pub async fn set_filter(&mut self, filter: StatusFilter) -> EnrichmentOutcome {
        let ticket = self.view.set_filter(filter);
        self.enrich(ticket).await
    }

    pub async fn goto_page(&mut self, page: usize) -> EnrichmentOutcome {
        let ticket = self.view.goto_page(page);
        self.enrich(ticket).await
    }

    pub async fn next_page(&mut self) -> EnrichmentOutcome {
        let ticket = self.view.next_page();
        self.enrich(ticket).await
    }

    pub async fn prev_page(&mut self) -> EnrichmentOutcome {
        let ticket = self.view.prev_page();
        self.enrich(ticket).await
    }

    pub async fn refresh_page(&mut self) -> EnrichmentOutcome {
        let ticket = self.view.refresh_page();
        self.enrich(ticket).await
    }

    pub fn export_visible(&self) -> ExportArtifact {
        self.view.export_visible()
    }

    /// Issue a view change and get its ticket without fetching; pair with
    /// [`JobConsole::fetch`] and [`JobConsole::apply`] to overlap requests.
    pub fn view_mut(&mut self) -> &mut JobStatusView {
        &mut self.view
    }

    /// Fetch metrics for a ticket. Does not borrow the console, so several
    /// fetches can be in flight while the view keeps changing.
    pub fn fetch(
        &self,
        ticket: EnrichmentTicket,
    ) -> impl Future<Output = (EnrichmentTicket, Result<Vec<UrlInfo>, ApiError>)> + Send + 'static
    {
        let client = self.client.clone();
        async move {
            let urls = ticket.urls().to_vec();
            let result = match tokio::task::spawn_blocking(move || client.url_info(&urls)).await {
                Ok(r) => r,
                Err(e) => Err(ApiError::Join(e)),
            };
            (ticket, result)
        }
    }

    pub fn apply(
        &mut self,
        ticket: EnrichmentTicket,
        result: Result<Vec<UrlInfo>, ApiError>,
    ) -> EnrichmentOutcome {
        match self.view.complete_enrichment(ticket, result) {
            Ok(MergeOutcome::Applied { mismatches }) => {
                if mismatches > 0 {
                    tracing::warn!(mismatches, "enrichment rows did not line up with the page");
                }
                EnrichmentOutcome::Merged { mismatches }
            }
            Ok(MergeOutcome::Stale) => EnrichmentOutcome::Stale,
            Err(e) => EnrichmentOutcome::Failed(e),
        }
    }

    async fn enrich(&mut self, ticket: Option<EnrichmentTicket>) -> EnrichmentOutcome {
        let Some(ticket) = ticket else {
            return EnrichmentOutcome::Skipped;
        };
        let (ticket, result) = self.fetch(ticket).await;
        self.apply(ticket, result)
    }

    async fn load_snapshot(&self, job_id: &str) -> Result<(String, JobSnapshot), ApiError> {
        self.client.ensure_credentials()?;
        let id = require_job_id(job_id)?.to_string();
        let client = self.client.clone();
        let query_id = id.clone();
        let response = tokio::task::spawn_blocking(move || client.job_status(&query_id)).await??;
        tracing::info!(job_id = %id, "job status fetched");
        Ok((id, JobSnapshot::from(response)))
    }
}
