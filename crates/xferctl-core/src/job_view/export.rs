//! Text export of the filtered URL set.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::DisplayItem;

/// Content written when the filtered set is empty.
pub const EMPTY_EXPORT: &str = "NULL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content: String,
}

impl ExportArtifact {
    /// One URL per line, or [`EMPTY_EXPORT`] when there are none.
    pub fn from_items(job_id: &str, items: &[DisplayItem]) -> Self {
        let content = if items.is_empty() {
            EMPTY_EXPORT.to_string()
        } else {
            items
                .iter()
                .map(|i| i.url.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        };
        Self {
            file_name: file_name_for(job_id),
            content,
        }
    }

    /// Write into `dir` under `file_name`; returns the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("create dir: {}", dir.display()))?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.content)
            .with_context(|| format!("write export: {}", path.display()))?;
        Ok(path)
    }
}

/// `job-<id>-urls.txt` with path-hostile characters replaced.
fn file_name_for(job_id: &str) -> String {
    let safe: String = job_id
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if safe.is_empty() {
        "job-urls.txt".to_string()
    } else {
        format!("job-{safe}-urls.txt")
    }
}
