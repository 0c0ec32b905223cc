//! Export ordering of a ranked batch.

use std::cmp::Ordering;

use super::config::TieBreaker;
use super::types::{JobRecord, CANNOT_DO_PRIORITY};

/// Orders a ranked batch for export.
///
/// Ranked jobs come first, ascending by priority. Jobs pinned to
/// [`CANNOT_DO_PRIORITY`] follow in their input order. Among jobs with the
/// same priority, `tie_breaker` decides.
///
/// Jobs without a priority are placed last, after the excluded jobs.
pub fn export_order(batch: &[JobRecord], tie_breaker: TieBreaker) -> Vec<&JobRecord> {
    let (mut ranked, rest): (Vec<&JobRecord>, Vec<&JobRecord>) = batch
        .iter()
        .partition(|job| matches!(job.priority, Some(p) if p != CANNOT_DO_PRIORITY));

    ranked.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| match tie_breaker {
                TieBreaker::PreserveOrder => Ordering::Equal,
                TieBreaker::ByJobId => a.job_id.cmp(&b.job_id),
            })
    });

    let (excluded, unranked): (Vec<&JobRecord>, Vec<&JobRecord>) =
        rest.into_iter().partition(|job| job.is_excluded());

    ranked.extend(excluded);
    ranked.extend(unranked);
    ranked
}
