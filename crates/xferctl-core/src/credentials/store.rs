//! Persist credentials as TOML under the XDG config dir (`~/.config/xferctl/credentials.toml`).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::{Credential, CredentialProvider};

/// Cleartext key-value store for the access/secret key pair.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("xferctl")?;
        Ok(xdg_dirs.get_config_home().join("credentials.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored pair. A missing file yields an empty credential.
    pub fn load(&self) -> Result<Credential> {
        let data = match fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Credential::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("read credentials: {}", self.path.display()))
            }
        };
        toml::from_str(&data).with_context(|| format!("parse credentials: {}", self.path.display()))
    }

    /// Replace both keys in one write (temp file + rename). Keys are trimmed.
    pub fn save(&self, credential: &Credential) -> Result<()> {
        let trimmed = Credential::new(credential.access_key.trim(), credential.secret_key.trim());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let body = toml::to_string_pretty(&trimmed).context("serialize credentials")?;
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, body).with_context(|| format!("write credentials: {}", tmp.display()))?;
        restrict_permissions(&tmp)?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace credentials: {}", self.path.display()))?;
        tracing::info!("saved credentials to {}", self.path.display());
        Ok(())
    }
}

impl CredentialProvider for FileCredentialStore {
    fn credential(&self) -> Result<Credential> {
        self.load()
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("chmod 600: {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
