//! Report building and export.
//!
//! Turns a ranked batch into export rows (ranked jobs by priority, then
//! excluded jobs), a per-priority summary and batch-level counts, and
//! writes them as CSV.

mod rows;
mod summary;
mod writer;

pub use rows::{build_report, ReportRow};
pub use summary::{priority_summary, summary_statistics, Metric, PriorityGroup};
pub use writer::{summary_path, write_report, write_report_to, write_summary, write_summary_to};
