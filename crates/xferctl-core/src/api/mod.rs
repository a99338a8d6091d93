//! Signed client for the transfer service REST API.
//!
//! Every call checks that keys are configured, signs the request path (never
//! the query) with [`RequestSigner`], and maps any non-2xx response to
//! [`ApiError::Http`] with the raw body. There are no retries: a failure is
//! terminal for that user action.

mod error;
mod transport;
mod types;

pub use error::{ApiError, ErrorClass};
pub use transport::{CurlTransport, HttpRequest, HttpResponse, Transport};
pub use types::{
    CurrentSpeed, FinishedSizeResponse, JobListEntry, JobListQuery, JobStatus,
    JobStatusResponse, Metric, Span, StatusMask, TargetType, TransferRequest, TransferResponse,
    UrlInfo,
};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::config::ConsoleConfig;
use crate::credentials::{require_credentials, CredentialProvider};
use crate::signer::{HttpMethod, RequestSigner};

pub const PATH_STATUS: &str = "/status";
pub const PATH_URL_INFO: &str = "/joburlsinfo";
pub const PATH_TRANSFER_JOB: &str = "/transferjob";
pub const PATH_FINISHED_SIZE: &str = "/finishedsize";
pub const PATH_CURRENT_SPEED: &str = "/currentspeed";
pub const PATH_JOB_DETAIL: &str = "/jobdetail";
pub const PATH_JOB_LIST: &str = "/joblist";
pub const PATH_SUSPEND_JOB: &str = "/suspendjob";
pub const PATH_RESUME_JOB: &str = "/resumejob";
pub const PATH_SCHEDULE: &str = "/schedule";

/// Trimmed job id, or [`ApiError::MissingInput`] when blank.
pub fn require_job_id(job_id: &str) -> Result<&str, ApiError> {
    let id = job_id.trim();
    if id.is_empty() {
        return Err(ApiError::MissingInput("No job ID specified"));
    }
    Ok(id)
}

/// Cheap to clone; clones share the signer and transport.
#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    signer: RequestSigner,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(
        endpoint: &str,
        signer: RequestSigner,
        transport: Arc<dyn Transport>,
    ) -> anyhow::Result<Self> {
        let base = Url::parse(endpoint).with_context(|| format!("invalid endpoint: {endpoint}"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("endpoint is not a base URL: {endpoint}");
        }
        Ok(Self {
            base,
            signer,
            transport,
        })
    }

    /// Client for the configured endpoint over libcurl.
    pub fn from_config(
        cfg: &ConsoleConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> anyhow::Result<Self> {
        let transport = Arc::new(CurlTransport::new(cfg.request_timeout()));
        Self::new(&cfg.endpoint, RequestSigner::new(credentials), transport)
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Precondition check shared by every call.
    pub fn ensure_credentials(&self) -> Result<(), ApiError> {
        require_credentials(self.signer.credentials()).map(|_| ())
    }

    fn request_url(&self, path: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url.set_query(None);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    fn call(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, ApiError> {
        self.ensure_credentials()?;
        let signed = self.signer.sign(method, path, body.as_deref())?;
        let request = HttpRequest {
            method,
            url: self.request_url(path, query).into(),
            headers: signed
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body,
        };
        tracing::debug!(%method, path, "calling transfer service");
        let response = self.transport.execute(&request)?;
        if !response.is_success() {
            tracing::warn!(%method, path, status = response.status, "request rejected");
            return Err(ApiError::Http {
                status: response.status,
                body: response.text(),
            });
        }
        Ok(response)
    }

    fn call_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
        what: &'static str,
    ) -> Result<T, ApiError> {
        let response = self.call(method, path, query, body)?;
        serde_json::from_slice(&response.body).map_err(|source| ApiError::Json { what, source })
    }

    fn encode<T: Serialize + ?Sized>(value: &T, what: &'static str) -> Result<Vec<u8>, ApiError> {
        serde_json::to_vec(value).map_err(|source| ApiError::Json { what, source })
    }

    /// `GET /status?jobid=`: finished/pending/failed classification of a job.
    pub fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, ApiError> {
        self.ensure_credentials()?;
        let id = require_job_id(job_id)?;
        self.call_json(
            HttpMethod::Get,
            PATH_STATUS,
            &[("jobid", id.to_string())],
            None,
            "decode job status",
        )
    }

    /// `POST /joburlsinfo`: live metrics for exactly these URLs, in request order.
    pub fn url_info(&self, urls: &[String]) -> Result<Vec<UrlInfo>, ApiError> {
        let body = Self::encode(urls, "encode url list")?;
        let infos: Option<Vec<UrlInfo>> = self.call_json(
            HttpMethod::Post,
            PATH_URL_INFO,
            &[],
            Some(body),
            "decode url info",
        )?;
        Ok(infos.unwrap_or_default())
    }

    /// `PUT /transferjob`: returns the new job id.
    pub fn submit_job(&self, request: &TransferRequest) -> Result<String, ApiError> {
        let body = Self::encode(request, "encode transfer request")?;
        let resp: TransferResponse = self.call_json(
            HttpMethod::Put,
            PATH_TRANSFER_JOB,
            &[],
            Some(body),
            "decode transfer response",
        )?;
        tracing::info!(job_id = %resp.jobid, files = request.origin_files.len(), "job submitted");
        Ok(resp.jobid)
    }

    pub fn finished_size(&self) -> Result<i64, ApiError> {
        let resp: FinishedSizeResponse = self.call_json(
            HttpMethod::Get,
            PATH_FINISHED_SIZE,
            &[],
            None,
            "decode finished size",
        )?;
        Ok(resp.finished_size)
    }

    pub fn current_speed(&self) -> Result<CurrentSpeed, ApiError> {
        self.call_json(
            HttpMethod::Get,
            PATH_CURRENT_SPEED,
            &[],
            None,
            "decode current speed",
        )
    }

    /// `GET /jobdetail?jobid=`: every URL of the job with metrics and status.
    pub fn job_detail(&self, job_id: &str) -> Result<Vec<UrlInfo>, ApiError> {
        self.ensure_credentials()?;
        let id = require_job_id(job_id)?;
        let infos: Option<Vec<UrlInfo>> = self.call_json(
            HttpMethod::Get,
            PATH_JOB_DETAIL,
            &[("jobid", id.to_string())],
            None,
            "decode job detail",
        )?;
        Ok(infos.unwrap_or_default())
    }

    pub fn job_list(&self, query: &JobListQuery) -> Result<Vec<JobListEntry>, ApiError> {
        let entries: Option<Vec<JobListEntry>> = self.call_json(
            HttpMethod::Get,
            PATH_JOB_LIST,
            &query.query_pairs(),
            None,
            "decode job list",
        )?;
        Ok(entries.unwrap_or_default())
    }

    pub fn suspend_job(&self, job_id: &str) -> Result<(), ApiError> {
        self.ensure_credentials()?;
        let id = require_job_id(job_id)?;
        self.call(HttpMethod::Post, PATH_SUSPEND_JOB, &[("jobid", id.to_string())], None)?;
        tracing::info!(job_id = id, "job suspended");
        Ok(())
    }

    pub fn resume_job(&self, job_id: &str) -> Result<(), ApiError> {
        self.ensure_credentials()?;
        let id = require_job_id(job_id)?;
        self.call(HttpMethod::Post, PATH_RESUME_JOB, &[("jobid", id.to_string())], None)?;
        tracing::info!(job_id = id, "job resumed");
        Ok(())
    }

    /// `PUT /schedule`. Spans must already be validated.
    pub fn put_schedule(&self, spans: &[Span]) -> Result<(), ApiError> {
        let body = Self::encode(spans, "encode schedule")?;
        self.call(HttpMethod::Put, PATH_SCHEDULE, &[], Some(body))?;
        Ok(())
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}
