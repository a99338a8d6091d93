use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Page size of the job status and job list views.
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// Page size of the per-URL job detail view.
pub const DEFAULT_DETAIL_PAGE_SIZE: usize = 5;
/// Refresh period of the aggregate throughput/size statistics.
pub const DEFAULT_STATS_INTERVAL_SECS: u64 = 10;

/// Where exported URL lists are written (optional section in config.toml).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Target directory; current directory when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Global configuration loaded from `~/.config/xferctl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the transfer service (scheme, host, port).
    pub endpoint: String,
    /// Rows per page in the job status and job list views.
    pub page_size: usize,
    /// Rows per page in the job detail view.
    pub detail_page_size: usize,
    /// Seconds between aggregate statistics refreshes in `stats --watch`.
    pub stats_interval_secs: u64,
    /// Optional whole-request timeout in seconds (None = transport default, no limit).
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub export: Option<ExportConfig>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            detail_page_size: DEFAULT_DETAIL_PAGE_SIZE,
            stats_interval_secs: DEFAULT_STATS_INTERVAL_SECS,
            request_timeout_secs: None,
            export: None,
        }
    }
}

impl ConsoleConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_secs.max(1))
    }

    pub fn export_dir(&self) -> Option<&Path> {
        self.export.as_ref().and_then(|e| e.dir.as_deref())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("xferctl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ConsoleConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ConsoleConfig> {
    if !path.exists() {
        let default_cfg = ConsoleConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ConsoleConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
