//! `xferctl configure` – save the signing keys.

use anyhow::{bail, Result};
use xferctl_core::credentials::{Credential, FileCredentialStore};

pub fn run_configure(store: &FileCredentialStore, access_key: &str, secret_key: &str) -> Result<()> {
    let credential = Credential::new(access_key, secret_key);
    if !credential.is_complete() {
        bail!("Both an access key and a secret key are required");
    }
    store.save(&credential)?;
    println!("Saved keys to {}", store.path().display());
    Ok(())
}
