//! Access/secret key pair used to sign every API call.
//!
//! The signer reads keys through [`CredentialProvider`] so the storage backing
//! (plain TOML file today) can be swapped without touching the signing code.

mod store;

pub use store::FileCredentialStore;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::ApiError;

/// Access key and secret key. A missing field reads as the empty string.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
}

impl Credential {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// True when both keys are present (non-blank).
    pub fn is_complete(&self) -> bool {
        !self.access_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.secret_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Credential")
            .field("access_key", &self.access_key)
            .field("secret_key", &secret)
            .finish()
    }
}

/// Source of the current credential, read on every signed request.
pub trait CredentialProvider: Send + Sync {
    fn credential(&self) -> Result<Credential>;
}

/// In-memory credential; used by tests and by callers that take keys from the environment.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Credential);

impl StaticCredentials {
    pub fn new(credential: Credential) -> Self {
        Self(credential)
    }
}

impl CredentialProvider for StaticCredentials {
    fn credential(&self) -> Result<Credential> {
        Ok(self.0.clone())
    }
}

/// Fails with [`ApiError::MissingCredentials`] unless both keys are configured.
pub fn require_credentials(provider: &dyn CredentialProvider) -> Result<Credential, ApiError> {
    let credential = provider
        .credential()
        .map_err(|e| ApiError::Credentials(format!("{e:#}")))?;
    if !credential.is_complete() {
        return Err(ApiError::MissingCredentials);
    }
    Ok(credential)
}
