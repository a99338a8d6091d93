//! `xferctl suspend|resume <job>`.

use anyhow::Result;
use xferctl_core::api::ApiClient;

use super::blocking;

pub async fn run_suspend(client: &ApiClient, job_id: &str) -> Result<()> {
    let id = job_id.to_string();
    blocking(client, move |c| c.suspend_job(&id)).await?;
    println!("Suspended job {}", job_id.trim());
    Ok(())
}

pub async fn run_resume(client: &ApiClient, job_id: &str) -> Result<()> {
    let id = job_id.to_string();
    blocking(client, move |c| c.resume_job(&id)).await?;
    println!("Resumed job {}", job_id.trim());
    Ok(())
}
