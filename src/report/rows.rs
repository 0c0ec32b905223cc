//! Export rows.

use crate::error::{PriorityError, Result};
use crate::ranking::{export_order, JobRecord, TieBreaker};

/// Display format for due instants when the source text is unavailable.
const DUE_DISPLAY_FORMAT: &str = "%d/%m/%Y %I:%M:%S %p";

/// One line of the prioritized jobs report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub priority: i64,
    pub job_id: String,
    pub job_type: String,
    pub standard_job: String,
    pub location: String,
    pub due: String,
    pub area: Option<String>,
    pub cannot_do: bool,
    pub needs_check: bool,
}

impl ReportRow {
    fn from_job(job: &JobRecord, priority: i64) -> Self {
        let due = if job.due_raw.is_empty() {
            job.due_instant
                .map(|d| d.format(DUE_DISPLAY_FORMAT).to_string())
                .unwrap_or_default()
        } else {
            job.due_raw.clone()
        };
        Self {
            priority,
            job_id: job.job_id.clone(),
            job_type: job.category.clone(),
            standard_job: job.standard_job.clone(),
            location: job.location.clone(),
            due,
            area: job.area.clone(),
            cannot_do: !job.can_do_internally,
            needs_check: job.needs_capability_check,
        }
    }
}

/// Builds report rows in export order.
///
/// Fails with [`PriorityError::Unranked`] if any job has no priority.
pub fn build_report(batch: &[JobRecord], tie_breaker: TieBreaker) -> Result<Vec<ReportRow>> {
    if let Some(job) = batch.iter().find(|job| job.priority.is_none()) {
        return Err(PriorityError::Unranked {
            job_id: job.job_id.clone(),
        });
    }
    Ok(export_order(batch, tie_breaker)
        .into_iter()
        .filter_map(|job| job.priority.map(|p| ReportRow::from_job(job, p)))
        .collect())
}
