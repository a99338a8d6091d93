//! `xferctl schedule START-END...` – replace the transfer schedule.

use anyhow::Result;
use xferctl_core::api::ApiClient;
use xferctl_core::schedule;

use super::blocking;

pub async fn run_schedule(client: &ApiClient, spans: &[String]) -> Result<()> {
    let specs = spans.to_vec();
    let count = specs.len();
    blocking(client, move |c| schedule::apply_specs(c, specs.as_slice())).await?;
    if count == 0 {
        println!("Schedule cleared");
    } else {
        println!("Schedule set ({count} span(s))");
    }
    Ok(())
}
