//! Job views: status (snapshot + per-page enrichment), detail, and job list.
//!
//! [`JobStatusView`] is the synchronous state machine; it never performs I/O.
//! Operations that need fresh metrics return an [`EnrichmentTicket`] which the
//! caller fetches and hands back through [`JobStatusView::complete_enrichment`].
//! [`JobConsole`] drives a view against the live API on tokio.

mod console;
mod detail;
mod export;
mod filter;
mod list;
mod merge;
mod pager;
mod snapshot;
mod summary;
mod view;

pub use console::{EnrichmentOutcome, JobConsole};
pub use detail::JobDetailView;
pub use export::{ExportArtifact, EMPTY_EXPORT};
pub use filter::{display_set, DisplayItem, StatusFilter};
pub use list::JobListView;
pub use merge::{merge_page, unenriched_rows, DisplayRow, RowStatus, UrlMetrics};
pub use pager::{total_pages, Pager};
pub use snapshot::JobSnapshot;
pub use summary::{JobSummary, Throughput};
pub use view::{EnrichmentTicket, JobStatusView, MergeOutcome};
