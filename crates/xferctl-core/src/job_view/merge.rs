//! Position-aligned merge of enrichment responses into page rows.
//!
//! Row `i` takes the metrics of response entry `i` only when both carry the
//! same URL. Otherwise the row is marked [`RowStatus::Mismatch`] and keeps the
//! metrics previously cached for its own URL, so one URL's metrics are never
//! shown next to another URL's status.

use std::collections::HashMap;
use std::fmt;

use crate::api::{JobStatus, Metric, UrlInfo};

use super::DisplayItem;

/// Live metrics of one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UrlMetrics {
    pub size: Metric,
    pub speed: Metric,
    pub percentage: Metric,
}

impl From<&UrlInfo> for UrlMetrics {
    fn from(info: &UrlInfo) -> Self {
        Self {
            size: info.size,
            speed: info.speed,
            percentage: info.percentage,
        }
    }
}

/// Status column of a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Known(JobStatus),
    /// Enrichment response did not line up with this row.
    Mismatch,
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStatus::Known(s) => write!(f, "{s}"),
            RowStatus::Mismatch => f.write_str("unknown (mismatch)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub url: String,
    pub status: RowStatus,
    pub metrics: UrlMetrics,
}

/// Rows for a page before (or without) a fresh enrichment: cached metrics, else unknown.
pub fn unenriched_rows(page: &[DisplayItem], cache: &HashMap<String, UrlMetrics>) -> Vec<DisplayRow> {
    page.iter()
        .map(|item| DisplayRow {
            url: item.url.clone(),
            status: RowStatus::Known(item.status),
            metrics: cache.get(&item.url).copied().unwrap_or_default(),
        })
        .collect()
}

/// Merge `response` into `page` by position. Updates `cache` for aligned rows and
/// returns the rows plus the number of mismatched positions.
pub fn merge_page(
    page: &[DisplayItem],
    response: &[UrlInfo],
    cache: &mut HashMap<String, UrlMetrics>,
) -> (Vec<DisplayRow>, usize) {
    if response.len() > page.len() {
        tracing::warn!(
            expected = page.len(),
            received = response.len(),
            "enrichment returned extra entries; ignoring them"
        );
    }
    let mut mismatches = 0;
    let rows = page
        .iter()
        .enumerate()
        .map(|(i, item)| match response.get(i) {
            Some(info) if info.url == item.url => {
                let metrics = UrlMetrics::from(info);
                cache.insert(item.url.clone(), metrics);
                DisplayRow {
                    url: item.url.clone(),
                    status: RowStatus::Known(item.status),
                    metrics,
                }
            }
            other => {
                mismatches += 1;
                tracing::debug!(
                    position = i,
                    expected = %item.url,
                    received = other.map(|o| o.url.as_str()).unwrap_or("<missing>"),
                    "enrichment misaligned"
                );
                DisplayRow {
                    url: item.url.clone(),
                    status: RowStatus::Mismatch,
                    metrics: cache.get(&item.url).copied().unwrap_or_default(),
                }
            }
        })
        .collect();
    (rows, mismatches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str, status: JobStatus) -> DisplayItem {
        DisplayItem {
            url: url.into(),
            status,
        }
    }

    fn info(url: &str, size: i64, speed: i64, pct: i64) -> UrlInfo {
        UrlInfo {
            url: url.into(),
            size: size.into(),
            speed: speed.into(),
            percentage: pct.into(),
            status: None,
        }
    }

    #[test]
    fn aligned_response_keeps_local_status() {
        let page = [item("a", JobStatus::Finished), item("b", JobStatus::Finished)];
        let mut cache = HashMap::new();
        let (rows, mismatches) =
            merge_page(&page, &[info("a", 10, 0, 100), info("b", -1, 5, -1)], &mut cache);
        assert_eq!(mismatches, 0);
        assert_eq!(rows[0].status, RowStatus::Known(JobStatus::Finished));
        assert_eq!(rows[1].status, RowStatus::Known(JobStatus::Finished));
        assert_eq!(rows[0].metrics.size, Metric::Known(10));
        assert_eq!(rows[1].metrics.size.to_string(), "unknown");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn swapped_response_marks_mismatch() {
        let page = [item("a", JobStatus::Finished), item("b", JobStatus::Pending)];
        let mut cache = HashMap::new();
        let (rows, mismatches) =
            merge_page(&page, &[info("b", 20, 2, 40), info("a", 10, 1, 100)], &mut cache);
        assert_eq!(mismatches, 2);
        assert_eq!(rows[0].url, "a");
        assert_eq!(rows[0].status, RowStatus::Mismatch);
        // b's metrics never land on a's row.
        assert_eq!(rows[0].metrics, UrlMetrics::default());
        assert!(cache.is_empty());
    }

    #[test]
    fn mismatch_keeps_previously_cached_metrics_for_own_url() {
        let page = [item("a", JobStatus::Pending)];
        let mut cache = HashMap::new();
        let earlier = UrlMetrics {
            size: Metric::Known(7),
            speed: Metric::Known(1),
            percentage: Metric::Known(30),
        };
        cache.insert("a".to_string(), earlier);
        let (rows, _) = merge_page(&page, &[info("z", 99, 99, 99)], &mut cache);
        assert_eq!(rows[0].status, RowStatus::Mismatch);
        assert_eq!(rows[0].metrics, earlier);
        assert_eq!(cache["a"], earlier);
    }

    #[test]
    fn short_response_mismatches_the_tail() {
        let page = [item("a", JobStatus::Failed), item("b", JobStatus::Failed)];
        let mut cache = HashMap::new();
        let (rows, mismatches) = merge_page(&page, &[info("a", 1, 1, 1)], &mut cache);
        assert_eq!(mismatches, 1);
        assert_eq!(rows[0].status, RowStatus::Known(JobStatus::Failed));
        assert_eq!(rows[1].status, RowStatus::Mismatch);
    }

    #[test]
    fn unenriched_rows_use_cache_or_unknown() {
        let page = [item("a", JobStatus::Pending), item("b", JobStatus::Failed)];
        let mut cache = HashMap::new();
        cache.insert(
            "a".to_string(),
            UrlMetrics {
                size: Metric::Known(3),
                ..UrlMetrics::default()
            },
        );
        let rows = unenriched_rows(&page, &cache);
        assert_eq!(rows[0].metrics.size, Metric::Known(3));
        assert_eq!(rows[1].metrics.size, Metric::Unknown);
        assert_eq!(rows[1].status.to_string(), "Failed");
        assert_eq!(RowStatus::Mismatch.to_string(), "unknown (mismatch)");
    }
}
