//! Due-date filtering.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::ranking::JobRecord;

/// Keeps jobs due on or after `reference`.
///
/// Jobs without a due instant cannot be compared and are dropped with a
/// warning. A blank due cell does not fail the run.
pub fn filter_by_due(jobs: Vec<JobRecord>, reference: NaiveDateTime) -> Vec<JobRecord> {
    let total = jobs.len();
    let undated = jobs.iter().filter(|job| job.due_instant.is_none()).count();
    if undated > 0 {
        warn!(undated, "Dropping jobs without a due date");
    }
    let kept: Vec<JobRecord> = jobs
        .into_iter()
        .filter(|job| job.due_instant.is_some_and(|due| due >= reference))
        .collect();
    info!(total, kept = kept.len(), %reference, "Filtered jobs by due date");
    kept
}
