//! `xferctl submit` – create a transfer job.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use xferctl_core::api::ApiClient;
use xferctl_core::submit::{submit_url_list, JobTarget};

use super::{blocking, surface};
use crate::cli::TargetArg;

pub async fn run_submit(
    client: &ApiClient,
    file: Option<&Path>,
    urls: Vec<String>,
    target: TargetArg,
    bucket: Option<String>,
    acl: Option<String>,
) -> Result<()> {
    client.ensure_credentials().map_err(surface)?;
    let mut text = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("read URL list: {}", path.display()))?,
        None => String::new(),
    };
    for url in urls {
        text.push('\n');
        text.push_str(&url);
    }
    let target = match target {
        TargetArg::S3s => JobTarget::S3s {
            bucket: bucket.unwrap_or_default(),
            acl: acl.unwrap_or_default(),
        },
        TargetArg::Vaas => JobTarget::Vaas,
    };

    let job_id = blocking(client, move |c| submit_url_list(c, &text, &target)).await?;
    println!("Submitted job {job_id}");
    Ok(())
}
