//! `xferctl status <job>` – one page of the job status view.

use anyhow::Result;
use xferctl_core::api::ApiClient;
use xferctl_core::config::ConsoleConfig;
use xferctl_core::job_view::{EnrichmentOutcome, JobConsole, StatusFilter};

use super::{render, surface};

pub async fn run_status(
    client: &ApiClient,
    cfg: &ConsoleConfig,
    job_id: &str,
    page: usize,
    filter: StatusFilter,
) -> Result<()> {
    let mut console = JobConsole::new(client.clone(), cfg.page_size);
    let outcome = console.open(job_id, filter, page).await.map_err(surface)?;

    match outcome {
        EnrichmentOutcome::Failed(err) => {
            eprintln!("metrics unavailable: {}", err.user_message());
        }
        EnrichmentOutcome::Merged { mismatches } if mismatches > 0 => {
            eprintln!("{mismatches} row(s) did not match the metrics response");
        }
        _ => {}
    }

    render::job_status(console.view());
    Ok(())
}
