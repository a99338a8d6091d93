//! Canonical string and HMAC signature for the `x-date` / `Authorization` scheme.

use base64::Engine as _;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha1::Sha1;

use crate::api::ApiError;

type HmacSha1 = Hmac<Sha1>;

/// Lowercase hex MD5 of the body; a missing body hashes as the empty string.
pub fn body_digest(body: Option<&[u8]>) -> String {
    hex::encode(Md5::digest(body.unwrap_or_default()))
}

/// `method \n timestamp \n body_digest \n path`: always four fields, three newlines.
pub fn canonical_string(method: &str, timestamp: &str, body_digest: &str, path: &str) -> String {
    format!("{method}\n{timestamp}\n{body_digest}\n{path}")
}

/// Base64(HMAC-SHA1(secret, canonical)).
pub fn signature(secret_key: &str, canonical: &str) -> Result<String, ApiError> {
    let mut mac = HmacSha1::new_from_slice(secret_key.as_bytes())
        .map_err(|e| ApiError::Signing(e.to_string()))?;
    mac.update(canonical.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}
