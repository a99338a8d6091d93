//! Request signing.
//!
//! Every API call carries two headers: `x-date` (an HTTP-date generated for
//! this call) and `Authorization: <access_key>:<signature>`, where the
//! signature is Base64(HMAC-SHA1) of the canonical string
//! `method\nx-date\nmd5(body)\npath` keyed by the secret key. Requests
//! without a body use the MD5 of the empty string. The signer holds no
//! mutable state and can be shared across threads.

mod canonical;
mod clock;

pub use canonical::{body_digest, canonical_string, signature};
pub use clock::{http_date, Clock, FixedClock, SystemClock};

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use crate::api::ApiError;
use crate::credentials::{Credential, CredentialProvider};

pub const HEADER_DATE: &str = "x-date";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// Methods used by the transfer service API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headers for one request. Built fresh per call, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body_digest: String,
    pub timestamp: String,
    pub authorization: String,
}

impl SignedRequest {
    /// Sign with an explicit credential and instant. Pure: same inputs, same headers.
    pub fn sign_at(
        credential: &Credential,
        method: HttpMethod,
        path: &str,
        body: Option<&[u8]>,
        at: &DateTime<Utc>,
    ) -> Result<Self, ApiError> {
        let timestamp = http_date(at);
        let digest = body_digest(body);
        let canonical = canonical_string(method.as_str(), &timestamp, &digest, path);
        let sig = signature(&credential.secret_key, &canonical)?;
        Ok(Self {
            method,
            path: path.to_string(),
            body_digest: digest,
            timestamp,
            authorization: format!("{}:{}", credential.access_key, sig),
        })
    }

    /// `(name, value)` pairs to attach to the HTTP request.
    pub fn headers(&self) -> [(&'static str, &str); 2] {
        [
            (HEADER_DATE, self.timestamp.as_str()),
            (HEADER_AUTHORIZATION, self.authorization.as_str()),
        ]
    }
}

/// Builds [`SignedRequest`]s from the current credential and clock.
///
/// Does not check that keys are configured: with an empty credential it signs
/// with an empty access key and an empty HMAC key. Callers gate on
/// [`crate::credentials::require_credentials`] first.
#[derive(Clone)]
pub struct RequestSigner {
    credentials: Arc<dyn CredentialProvider>,
    clock: Arc<dyn Clock>,
}

impl RequestSigner {
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self::with_clock(credentials, Arc::new(SystemClock))
    }

    pub fn with_clock(credentials: Arc<dyn CredentialProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { credentials, clock }
    }

    pub fn credentials(&self) -> &dyn CredentialProvider {
        self.credentials.as_ref()
    }

    /// Sign `method path` with an optional body, reading the credential and time now.
    pub fn sign(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&[u8]>,
    ) -> Result<SignedRequest, ApiError> {
        let credential = self
            .credentials
            .credential()
            .map_err(|e| ApiError::Credentials(format!("{e:#}")))?;
        let signed = SignedRequest::sign_at(&credential, method, path, body, &self.clock.now())?;
        tracing::debug!(method = %method, path, "signed request");
        Ok(signed)
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentials;
    use chrono::TimeZone;

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap()
    }

    fn signer(access: &str, secret: &str) -> RequestSigner {
        RequestSigner::with_clock(
            Arc::new(StaticCredentials::new(Credential::new(access, secret))),
            Arc::new(FixedClock(fixed())),
        )
    }

    #[test]
    fn sign_produces_date_and_authorization_headers() {
        let signed = signer("ak", "secret")
            .sign(HttpMethod::Get, "/status", None)
            .unwrap();
        assert_eq!(signed.timestamp, "Tue, 01 Jan 2019 00:00:00 GMT");
        assert_eq!(signed.authorization, "ak:LNLzeDzsOF7a29sBTDCKyqBmUAU=");
        let headers = signed.headers();
        assert_eq!(headers[0], ("x-date", "Tue, 01 Jan 2019 00:00:00 GMT"));
        assert_eq!(headers[1].0, "Authorization");
    }

    #[test]
    fn identical_inputs_sign_identically() {
        let s = signer("ak", "secret");
        let a = s.sign(HttpMethod::Put, "/transferjob", Some(b"{}")).unwrap();
        let b = s.sign(HttpMethod::Put, "/transferjob", Some(b"{}")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn body_changes_digest_and_signature() {
        let s = signer("ak", "secret");
        let a = s.sign(HttpMethod::Post, "/joburlsinfo", Some(b"[\"a\"]")).unwrap();
        let b = s.sign(HttpMethod::Post, "/joburlsinfo", Some(b"[\"b\"]")).unwrap();
        assert_ne!(a.body_digest, b.body_digest);
        assert_ne!(a.authorization, b.authorization);
    }

    #[test]
    fn method_and_path_are_signed() {
        let s = signer("ak", "secret");
        let get = s.sign(HttpMethod::Get, "/status", None).unwrap();
        let post = s.sign(HttpMethod::Post, "/status", None).unwrap();
        let other = s.sign(HttpMethod::Get, "/finishedsize", None).unwrap();
        assert_ne!(get.authorization, post.authorization);
        assert_ne!(get.authorization, other.authorization);
    }

    #[test]
    fn missing_credential_signs_with_empty_access_key() {
        let signed = signer("", "").sign(HttpMethod::Get, "/status", None).unwrap();
        let (access, sig) = signed.authorization.split_once(':').unwrap();
        assert_eq!(access, "");
        assert!(!sig.is_empty());
    }

    #[test]
    fn timestamp_is_read_per_call() {
        struct Ticking(std::sync::atomic::AtomicI64);
        impl Clock for Ticking {
            fn now(&self) -> DateTime<Utc> {
                let s = self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Utc.timestamp_opt(1_546_300_800 + s, 0).unwrap()
            }
        }
        let s = RequestSigner::with_clock(
            Arc::new(StaticCredentials::new(Credential::new("ak", "sk"))),
            Arc::new(Ticking(std::sync::atomic::AtomicI64::new(0))),
        );
        let a = s.sign(HttpMethod::Get, "/status", None).unwrap();
        let b = s.sign(HttpMethod::Get, "/status", None).unwrap();
        assert_ne!(a.timestamp, b.timestamp);
        assert_ne!(a.authorization, b.authorization);
    }
}
