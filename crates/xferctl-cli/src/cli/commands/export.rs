//! `xferctl export <job>` – write the filtered URL list to a file.

use anyhow::Result;
use std::path::PathBuf;
use xferctl_core::api::{require_job_id, ApiClient};
use xferctl_core::config::ConsoleConfig;
use xferctl_core::job_view::{JobSnapshot, JobStatusView, StatusFilter};

use super::{blocking, surface};

pub async fn run_export(
    client: &ApiClient,
    cfg: &ConsoleConfig,
    job_id: &str,
    filter: StatusFilter,
    out: Option<PathBuf>,
) -> Result<()> {
    client.ensure_credentials().map_err(surface)?;
    let id = require_job_id(job_id).map_err(surface)?.to_string();

    let query_id = id.clone();
    let response = blocking(client, move |c| c.job_status(&query_id)).await?;

    // Export covers every page, so no metrics fetch is needed.
    let mut view = JobStatusView::new(cfg.page_size);
    view.replace_snapshot(&id, JobSnapshot::from(response));
    view.set_filter(filter);
    let artifact = view.export_visible();

    let dir = match out.or_else(|| cfg.export_dir().map(PathBuf::from)) {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let path = artifact.write_to(&dir)?;
    println!(
        "Exported {} URL(s) to {}",
        view.display_set().len(),
        path.display()
    );
    Ok(())
}
