//! `xferctl detail <job>` – per-URL detail.

use anyhow::Result;
use xferctl_core::api::{require_job_id, ApiClient};
use xferctl_core::config::ConsoleConfig;
use xferctl_core::job_view::JobDetailView;

use super::{blocking, render, surface};

pub async fn run_detail(
    client: &ApiClient,
    cfg: &ConsoleConfig,
    job_id: &str,
    page: usize,
) -> Result<()> {
    client.ensure_credentials().map_err(surface)?;
    let id = require_job_id(job_id).map_err(surface)?.to_string();
    let entries = blocking(client, move |c| c.job_detail(&id)).await?;
    let mut view = JobDetailView::new(entries, cfg.detail_page_size);
    view.goto_page(page);
    render::job_detail(&view);
    Ok(())
}
