//! HTTP transport: one blocking request/response exchange.
//!
//! [`CurlTransport`] uses libcurl's easy interface. Runs in the current
//! thread; call from `spawn_blocking` if used from async code.

use std::time::Duration;

use super::ApiError;
use crate::signer::HttpMethod;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one request and returns the status and body; non-2xx is not an error here.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// libcurl-backed transport. No retries; no timeout unless configured.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    timeout: Option<Duration>,
}

impl CurlTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl Transport for CurlTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url)?;
        if let Some(t) = self.timeout {
            easy.timeout(t)?;
        }

        match request.method {
            HttpMethod::Get => easy.get(true)?,
            HttpMethod::Post => easy.post(true)?,
            HttpMethod::Put => {
                easy.post(true)?;
                easy.custom_request("PUT")?;
            }
        }
        if request.method != HttpMethod::Get {
            easy.post_fields_copy(request.body.as_deref().unwrap_or_default())?;
        }

        let mut list = curl::easy::List::new();
        for (k, v) in &request.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if request.body.is_some() {
            list.append("Content-Type: application/json")?;
        }
        // Suppress `Expect: 100-continue` on bodies.
        list.append("Expect:")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        tracing::debug!(method = %request.method, url = %request.url, status, "response");
        Ok(HttpResponse { status, body })
    }
}
