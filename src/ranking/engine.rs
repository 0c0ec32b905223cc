//! Dense composite-key priority assignment.
//!
//! # Algorithm
//!
//! 1. Partition the batch into excluded (cannot do) and eligible jobs
//! 2. Pin every excluded job to [`CANNOT_DO_PRIORITY`]
//! 3. Key each eligible job by `(category_rank, due_instant)`
//! 4. Stable-sort the eligible keys
//! 5. Fold over the sorted keys, carrying `(last_key, last_rank)`: an equal
//!    key reuses the rank, a different key takes the next integer
//!
//! The result equals `DENSE_RANK() OVER (ORDER BY category_rank, due_instant)`.

use tracing::debug;

use super::config::CategoryRanks;
use super::types::{JobRecord, RankKey, CANNOT_DO_PRIORITY};
use crate::error::{PriorityError, Result};

/// Counts produced by a single ranking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankingStats {
    /// Jobs ranked `1..=distinct_priorities`.
    pub eligible: usize,
    /// Jobs pinned to [`CANNOT_DO_PRIORITY`].
    pub excluded: usize,
    /// Number of distinct `(category, due)` keys among eligible jobs.
    pub distinct_priorities: usize,
}

/// Assigns dense ranks to keys that are already sorted ascending.
///
/// The first key gets 1. Each following key reuses the previous rank when
/// it equals the previous key, otherwise takes the previous rank plus one.
///
/// # Examples
///
/// ```
/// use job_priority::ranking::dense_rank;
///
/// assert_eq!(dense_rank(&[1, 1, 2, 5, 5, 5, 9]), vec![1, 1, 2, 3, 3, 3, 4]);
/// assert!(dense_rank::<u32>(&[]).is_empty());
/// ```
pub fn dense_rank<K: PartialEq>(sorted_keys: &[K]) -> Vec<i64> {
    let (ranks, _) = sorted_keys.iter().fold(
        (Vec::with_capacity(sorted_keys.len()), None::<(&K, i64)>),
        |(mut ranks, last), key| {
            let rank = match last {
                None => 1,
                Some((prev, prev_rank)) if prev == key => prev_rank,
                Some((_, prev_rank)) => prev_rank + 1,
            };
            ranks.push(rank);
            (ranks, Some((key, rank)))
        },
    );
    ranks
}

/// Priority assignment engine.
///
/// Holds only the category mapping, so one engine can rank any number of
/// independent batches.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use job_priority::ranking::{CategoryRanks, JobRecord, PriorityEngine};
///
/// let due = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let mut batch = vec![
///     JobRecord::new("J1", "SURVEY").with_due(due),
///     JobRecord::new("J2", "HAZARD").with_due(due),
///     JobRecord::new("J3", "REPAIRS").with_due(due).with_can_do(false),
/// ];
///
/// let engine = PriorityEngine::new(CategoryRanks::default()).unwrap();
/// let stats = engine.assign(&mut batch).unwrap();
///
/// let priorities: Vec<_> = batch.iter().map(|j| j.priority).collect();
/// assert_eq!(priorities, vec![Some(2), Some(1), Some(-1)]);
/// assert_eq!(stats.distinct_priorities, 2);
/// ```
#[derive(Debug, Clone)]
pub struct PriorityEngine {
    ranks: CategoryRanks,
}

impl PriorityEngine {
    /// Creates an engine, rejecting an empty mapping, a zero rank or two
    /// categories sharing a rank.
    pub fn new(ranks: CategoryRanks) -> Result<Self> {
        ranks.validate().map_err(PriorityError::InvalidConfig)?;
        Ok(Self { ranks })
    }

    /// Returns the category mapping.
    pub fn ranks(&self) -> &CategoryRanks {
        &self.ranks
    }

    /// Builds `(index, key)` pairs for every eligible job, in input order.
    ///
    /// Fails on the first eligible job whose category is not configured
    /// or whose due instant is missing.
    pub fn rank_keys(&self, batch: &[JobRecord]) -> Result<Vec<(usize, RankKey)>> {
        batch
            .iter()
            .enumerate()
            .filter(|(_, job)| job.can_do_internally)
            .map(|(idx, job)| -> Result<(usize, RankKey)> {
                let category_rank = self.ranks.rank_of(&job.category).ok_or_else(|| {
                    PriorityError::UnknownCategory {
                        job_id: job.job_id.clone(),
                        category: job.category.clone(),
                    }
                })?;
                let due_instant =
                    job.due_instant
                        .ok_or_else(|| PriorityError::MissingDueInstant {
                            job_id: job.job_id.clone(),
                        })?;
                Ok((idx, RankKey::new(category_rank, due_instant)))
            })
            .collect()
    }

    /// Writes `priority` on every job of the batch.
    ///
    /// The batch keeps its length and order. On error no priority is
    /// written.
    pub fn assign(&self, batch: &mut [JobRecord]) -> Result<RankingStats> {
        let mut keyed = self.rank_keys(batch)?;
        keyed.sort_by_key(|&(_, key)| key);

        let keys: Vec<RankKey> = keyed.iter().map(|&(_, key)| key).collect();
        let ranks = dense_rank(&keys);

        let mut excluded = 0;
        for job in batch.iter_mut().filter(|job| !job.can_do_internally) {
            job.priority = Some(CANNOT_DO_PRIORITY);
            excluded += 1;
        }
        for (&(idx, _), &rank) in keyed.iter().zip(&ranks) {
            batch[idx].priority = Some(rank);
        }

        let stats = RankingStats {
            eligible: keyed.len(),
            excluded,
            distinct_priorities: ranks.last().map_or(0, |&r| r as usize),
        };
        debug!(
            eligible = stats.eligible,
            excluded = stats.excluded,
            distinct = stats.distinct_priorities,
            "Priorities assigned"
        );
        Ok(stats)
    }

    /// Ranks several independent batches, in parallel with the `parallel`
    /// feature. Results are returned in batch order.
    #[cfg(feature = "parallel")]
    pub fn assign_batches(&self, batches: &mut [Vec<JobRecord>]) -> Vec<Result<RankingStats>> {
        use rayon::prelude::*;

        batches
            .par_iter_mut()
            .map(|batch| self.assign(batch))
            .collect()
    }

    /// Ranks several independent batches, in parallel with the `parallel`
    /// feature. Results are returned in batch order.
    #[cfg(not(feature = "parallel"))]
    pub fn assign_batches(&self, batches: &mut [Vec<JobRecord>]) -> Vec<Result<RankingStats>> {
        batches.iter_mut().map(|batch| self.assign(batch)).collect()
    }
}

/// Ranks `batch` with `ranks` and returns it.
///
/// An invalid mapping is rejected before any job is touched.
pub fn assign_priorities(
    mut batch: Vec<JobRecord>,
    ranks: &CategoryRanks,
) -> Result<Vec<JobRecord>> {
    PriorityEngine::new(ranks.clone())?.assign(&mut batch)?;
    Ok(batch)
}
