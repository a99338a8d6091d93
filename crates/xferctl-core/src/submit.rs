//! Job submission: URL list parsing, validation and request building.

use url::Url;

use crate::api::{ApiClient, ApiError, TargetType, TransferRequest};

/// Default object ACL for `s3s` targets.
pub const DEFAULT_ACL: &str = "private";

/// Where the transferred files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobTarget {
    S3s { bucket: String, acl: String },
    Vaas,
}

/// One URL per line; lines are trimmed and blank lines dropped.
pub fn parse_url_list(text: &str) -> Result<Vec<String>, ApiError> {
    let urls: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if urls.is_empty() {
        return Err(ApiError::MissingInput("No URLs specified"));
    }
    Ok(urls)
}

/// Every URL must parse as an absolute URL; all offenders are reported.
pub fn validate_urls(urls: &[String]) -> Result<(), ApiError> {
    let invalid: Vec<String> = urls
        .iter()
        .filter(|u| Url::parse(u).is_err())
        .cloned()
        .collect();
    if !invalid.is_empty() {
        for u in &invalid {
            tracing::debug!(url = %u, "rejected invalid URL");
        }
        return Err(ApiError::InvalidUrls(invalid));
    }
    Ok(())
}

pub fn build_request(urls: Vec<String>, target: &JobTarget) -> Result<TransferRequest, ApiError> {
    if urls.is_empty() {
        return Err(ApiError::MissingInput("No URLs specified"));
    }
    validate_urls(&urls)?;
    let request = match target {
        JobTarget::S3s { bucket, acl } => {
            let bucket = bucket.trim();
            if bucket.is_empty() {
                return Err(ApiError::MissingInput("No bucket specified"));
            }
            let acl = match acl.trim() {
                "" => DEFAULT_ACL,
                a => a,
            };
            TransferRequest {
                origin_files: urls,
                target_type: TargetType::S3s,
                target_bucket: Some(bucket.to_string()),
                target_acl: Some(acl.to_string()),
            }
        }
        JobTarget::Vaas => TransferRequest {
            origin_files: urls,
            target_type: TargetType::Vaas,
            target_bucket: None,
            target_acl: None,
        },
    };
    Ok(request)
}

/// Validate everything locally, then `PUT /transferjob`. Returns the job id.
pub fn submit(client: &ApiClient, urls: Vec<String>, target: &JobTarget) -> Result<String, ApiError> {
    client.ensure_credentials()?;
    let request = build_request(urls, target)?;
    client.submit_job(&request)
}

/// Keys first, then the URL list text, then [`submit`].
pub fn submit_url_list(client: &ApiClient, text: &str, target: &JobTarget) -> Result<String, ApiError> {
    client.ensure_credentials()?;
    let urls = parse_url_list(text)?;
    submit(client, urls, target)
}
