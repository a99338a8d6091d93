//! Wire types of the transfer service API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer metric that the service reports as `-1` when it is not known yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Metric {
    Known(i64),
    #[default]
    Unknown,
}

impl Metric {
    pub fn value(self) -> Option<i64> {
        match self {
            Metric::Known(v) => Some(v),
            Metric::Unknown => None,
        }
    }
}

impl From<i64> for Metric {
    fn from(v: i64) -> Self {
        if v < 0 {
            Metric::Unknown
        } else {
            Metric::Known(v)
        }
    }
}

impl From<Metric> for i64 {
    fn from(m: Metric) -> Self {
        m.value().unwrap_or(-1)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Known(v) => write!(f, "{v}"),
            Metric::Unknown => f.write_str("unknown"),
        }
    }
}

/// Classification of a job item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Finished,
    Pending,
    Failed,
}

impl JobStatus {
    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Finished => "Finished",
            JobStatus::Pending => "Pending",
            JobStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `GET /status` body. The service encodes empty lists as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusResponse {
    #[serde(rename = "jobid", default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(rename = "success-files", default)]
    pub success_files: Option<Vec<String>>,
    #[serde(rename = "queued-files", default)]
    pub queued_files: Option<Vec<String>>,
    #[serde(rename = "failed-files", default)]
    pub failed_files: Option<Vec<String>>,
}

/// Live metrics of one URL (`POST /joburlsinfo`, `GET /jobdetail`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlInfo {
    pub url: String,
    #[serde(default)]
    pub size: Metric,
    #[serde(default)]
    pub speed: Metric,
    #[serde(default)]
    pub percentage: Metric,
    /// Only present in job detail responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Destination kind of a transfer job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
    #[serde(rename = "s3s")]
    S3s,
    #[serde(rename = "Vaas")]
    Vaas,
}

/// `PUT /transferjob` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    #[serde(rename = "origin-files")]
    pub origin_files: Vec<String>,
    #[serde(rename = "target-type")]
    pub target_type: TargetType,
    #[serde(rename = "target-bucket", skip_serializing_if = "Option::is_none", default)]
    pub target_bucket: Option<String>,
    #[serde(rename = "target-acl", skip_serializing_if = "Option::is_none", default)]
    pub target_acl: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferResponse {
    pub jobid: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FinishedSizeResponse {
    #[serde(rename = "finished-size")]
    pub finished_size: i64,
}

/// `GET /currentspeed` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct CurrentSpeed {
    #[serde(rename = "upload-speed", default)]
    pub upload_speed: i64,
    #[serde(rename = "download-speed", default)]
    pub download_speed: i64,
}

/// One row of `GET /joblist`. Times are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobListEntry {
    pub jobid: String,
    #[serde(rename = "create-time", default)]
    pub create_time: i64,
    #[serde(rename = "complete-time", default)]
    pub complete_time: i64,
    /// The service spells this field `satus`.
    #[serde(rename = "satus", alias = "status", default)]
    pub status: String,
}

/// Status bitmask accepted by `GET /joblist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusMask(u8);

impl StatusMask {
    pub const FINISHED: StatusMask = StatusMask(1);
    pub const PENDING: StatusMask = StatusMask(2);
    pub const FAILED: StatusMask = StatusMask(4);
    pub const SCHEDULED: StatusMask = StatusMask(8);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: StatusMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Parse one name (`finished`, `pending`, `failed`, `scheduled`), case-insensitive.
    pub fn from_name(name: &str) -> Option<StatusMask> {
        match name.trim().to_ascii_lowercase().as_str() {
            "finished" => Some(Self::FINISHED),
            "pending" => Some(Self::PENDING),
            "failed" => Some(Self::FAILED),
            "scheduled" => Some(Self::SCHEDULED),
            _ => None,
        }
    }
}

impl std::ops::BitOr for StatusMask {
    type Output = StatusMask;

    fn bitor(self, rhs: StatusMask) -> StatusMask {
        StatusMask(self.0 | rhs.0)
    }
}

/// Filters for `GET /joblist`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobListQuery {
    /// Only jobs created after this unix time.
    pub since: Option<i64>,
    /// Only jobs created before this unix time.
    pub until: Option<i64>,
    pub status: StatusMask,
    pub job_id: Option<String>,
}

impl JobListQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(s) = self.since {
            pairs.push(("stime", s.to_string()));
        }
        if let Some(e) = self.until {
            pairs.push(("etime", e.to_string()));
        }
        if !self.status.is_empty() {
            pairs.push(("status", self.status.bits().to_string()));
        }
        if let Some(id) = self.job_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("jobid", id.to_string()));
        }
        pairs
    }
}

/// One transfer window of the user schedule (`PUT /schedule`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}
