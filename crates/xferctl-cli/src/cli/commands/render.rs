//! Plain-text tables for the job views.

use chrono::DateTime;
use xferctl_core::job_view::{JobDetailView, JobListView, JobStatusView, Throughput};
use xferctl_core::stats::AggregateStats;

fn throughput_line(t: &Throughput) -> String {
    format!(
        "Upload: {} B/s  Download: {} B/s  Finished size: {} B",
        t.upload_speed, t.download_speed, t.finished_size
    )
}

fn unix_time(secs: i64) -> String {
    if secs <= 0 {
        return "-".to_string();
    }
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

pub fn job_status(view: &JobStatusView) {
    let s = view.summary();
    println!("Job {}", view.job_id().unwrap_or("-"));
    println!(
        "Total: {}  Finished: {}  Pending: {}  Failed: {}",
        s.total, s.finished, s.pending, s.failed
    );
    println!("{}", throughput_line(&view.throughput()));
    println!("Page {}", view.page_label());
    if view.is_hidden() {
        println!("No URLs match the current filter.");
        return;
    }
    println!(
        "{:<20} {:<12} {:<10} {:<8} {}",
        "STATUS", "SIZE", "SPEED", "PCT", "URL"
    );
    for row in view.rows() {
        let m = &row.metrics;
        println!(
            "{:<20} {:<12} {:<10} {:<8} {}",
            row.status.to_string(),
            m.size.to_string(),
            m.speed.to_string(),
            m.percentage.to_string(),
            row.url
        );
    }
}

pub fn job_detail(view: &JobDetailView) {
    println!("{}", throughput_line(&view.throughput()));
    println!("Page {}", view.pager().label());
    if view.pager().is_empty() {
        println!("No URLs in this job.");
        return;
    }
    println!(
        "{:<10} {:<12} {:<10} {:<8} {}",
        "STATUS", "SIZE", "SPEED", "PCT", "URL"
    );
    for info in view.rows() {
        println!(
            "{:<10} {:<12} {:<10} {:<8} {}",
            info.status.as_deref().unwrap_or("-"),
            info.size.to_string(),
            info.speed.to_string(),
            info.percentage.to_string(),
            info.url
        );
    }
}

pub fn job_list(view: &JobListView) {
    if view.is_empty() {
        println!("No jobs found.");
        return;
    }
    println!("Page {}", view.pager().label());
    println!(
        "{:<38} {:<10} {:<20} {}",
        "JOB", "STATUS", "CREATED", "COMPLETED"
    );
    for job in view.rows() {
        println!(
            "{:<38} {:<10} {:<20} {}",
            job.jobid,
            job.status,
            unix_time(job.create_time),
            unix_time(job.complete_time)
        );
    }
}

pub fn stats(stats: &AggregateStats) {
    println!(
        "Finished size: {} B  Upload: {} B/s  Download: {} B/s",
        stats.finished_size, stats.upload_speed, stats.download_speed
    );
}
