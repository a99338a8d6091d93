//! CLI for the xferctl transfer-job console.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use xferctl_core::api::{ApiClient, StatusMask};
use xferctl_core::config;
use xferctl_core::credentials::FileCredentialStore;
use xferctl_core::job_view::StatusFilter;

use commands::{
    parse_status_mask, parse_time, run_completions, run_configure, run_detail, run_export,
    run_jobs, run_man, run_resume, run_schedule, run_stats, run_status, run_submit, run_suspend,
    JobsArgs,
};

/// Top-level CLI for the transfer-job console.
#[derive(Debug, Parser)]
#[command(name = "xferctl")]
#[command(about = "xferctl: submit and monitor transfer jobs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Destination of a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    /// Object storage bucket (needs --bucket).
    S3s,
    Vaas,
}

/// Status categories to hide in the job status view.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct FilterArgs {
    /// Hide finished URLs.
    #[arg(long)]
    pub no_finished: bool,
    /// Hide pending URLs.
    #[arg(long)]
    pub no_pending: bool,
    /// Hide failed URLs.
    #[arg(long)]
    pub no_failed: bool,
}

impl FilterArgs {
    pub fn filter(&self) -> StatusFilter {
        StatusFilter::new(!self.no_finished, !self.no_pending, !self.no_failed)
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Save the access key and secret key used to sign requests.
    Configure {
        #[arg(long, value_name = "KEY")]
        access_key: String,
        #[arg(long, value_name = "KEY")]
        secret_key: String,
    },

    /// Submit a transfer job for a list of URLs.
    Submit {
        /// File with one URL per line.
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
        /// URLs to transfer (added to those read from --file).
        urls: Vec<String>,
        #[arg(long, value_enum)]
        target: TargetArg,
        /// Destination bucket (s3s only).
        #[arg(long)]
        bucket: Option<String>,
        /// Object ACL (s3s only, default "private").
        #[arg(long)]
        acl: Option<String>,
    },

    /// Show one page of a job's URLs with live metrics.
    Status {
        job_id: String,
        #[arg(long, default_value = "1", value_name = "N")]
        page: usize,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Write the job's filtered URL list (all pages) to a text file.
    Export {
        job_id: String,
        #[command(flatten)]
        filter: FilterArgs,
        /// Output directory (default: configured export dir, else current dir).
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Show per-URL detail of a job.
    Detail {
        job_id: String,
        #[arg(long, default_value = "1", value_name = "N")]
        page: usize,
    },

    /// List jobs submitted with the configured keys.
    Jobs {
        /// Only jobs created at or after this time (unix seconds, RFC 3339 or YYYY-MM-DD).
        #[arg(long, value_parser = parse_time)]
        since: Option<i64>,
        /// Only jobs created before this time.
        #[arg(long, value_parser = parse_time)]
        until: Option<i64>,
        /// Comma-separated: finished, pending, failed, scheduled.
        #[arg(long, value_delimiter = ',', value_parser = parse_status_mask)]
        status: Vec<StatusMask>,
        /// Only this job.
        #[arg(long = "job", value_name = "ID")]
        job_id: Option<String>,
        #[arg(long, default_value = "1", value_name = "N")]
        page: usize,
    },

    /// Suspend a job.
    Suspend { job_id: String },

    /// Resume a suspended job.
    Resume { job_id: String },

    /// Replace the transfer schedule (no spans clears it).
    Schedule {
        /// Transfer windows as START-END (at most 5).
        #[arg(value_name = "START-END")]
        spans: Vec<String>,
    },

    /// Show aggregate finished size and current speeds.
    Stats {
        /// Keep refreshing on the configured interval until Ctrl-C.
        #[arg(long)]
        watch: bool,
        /// Stop after N refreshes (implies --watch).
        #[arg(long, value_name = "N")]
        count: Option<u64>,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print the man page.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Commands that need neither config nor keys.
        match cli.command {
            CliCommand::Completions { shell } => return run_completions(shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let store = Arc::new(FileCredentialStore::open_default()?);

        if let CliCommand::Configure {
            access_key,
            secret_key,
        } = &cli.command
        {
            return run_configure(&store, access_key, secret_key);
        }

        let client = ApiClient::from_config(&cfg, store)?;

        match cli.command {
            CliCommand::Submit {
                file,
                urls,
                target,
                bucket,
                acl,
            } => run_submit(&client, file.as_deref(), urls, target, bucket, acl).await?,
            CliCommand::Status {
                job_id,
                page,
                filter,
            } => run_status(&client, &cfg, &job_id, page, filter.filter()).await?,
            CliCommand::Export {
                job_id,
                filter,
                out,
            } => run_export(&client, &cfg, &job_id, filter.filter(), out).await?,
            CliCommand::Detail { job_id, page } => run_detail(&client, &cfg, &job_id, page).await?,
            CliCommand::Jobs {
                since,
                until,
                status,
                job_id,
                page,
            } => {
                let args = JobsArgs {
                    since,
                    until,
                    status,
                    job_id,
                    page,
                };
                run_jobs(&client, &cfg, args).await?
            }
            CliCommand::Suspend { job_id } => run_suspend(&client, &job_id).await?,
            CliCommand::Resume { job_id } => run_resume(&client, &job_id).await?,
            CliCommand::Schedule { spans } => run_schedule(&client, &spans).await?,
            CliCommand::Stats { watch, count } => run_stats(&client, &cfg, watch, count).await?,
            CliCommand::Configure { .. } | CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
