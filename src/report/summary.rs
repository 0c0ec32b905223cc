//! Priority and batch summaries.

use std::collections::BTreeMap;

use crate::ranking::{CategoryRanks, JobRecord};

/// Jobs sharing one priority value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityGroup {
    pub priority: i64,
    pub job_count: usize,
    /// Distinct job types in first-seen order.
    pub job_types: Vec<String>,
}

impl PriorityGroup {
    /// Job types joined with `", "`.
    pub fn job_types_label(&self) -> String {
        self.job_types.join(", ")
    }
}

/// Groups ranked jobs by priority, ascending. Unranked jobs are skipped.
pub fn priority_summary(batch: &[JobRecord]) -> Vec<PriorityGroup> {
    let mut groups: BTreeMap<i64, PriorityGroup> = BTreeMap::new();
    for job in batch {
        let Some(priority) = job.priority else {
            continue;
        };
        let group = groups.entry(priority).or_insert_with(|| PriorityGroup {
            priority,
            job_count: 0,
            job_types: Vec::new(),
        });
        group.job_count += 1;
        if !group.job_types.contains(&job.category) {
            group.job_types.push(job.category.clone());
        }
    }
    groups.into_values().collect()
}

/// A named count in the summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub name: String,
    pub count: usize,
}

impl Metric {
    fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Batch-level counts, one per configured category at the end.
pub fn summary_statistics(batch: &[JobRecord], categories: &CategoryRanks) -> Vec<Metric> {
    let can_do = batch.iter().filter(|j| j.can_do_internally).count();
    let needs_check = batch.iter().filter(|j| j.needs_capability_check).count();

    let mut metrics = vec![
        Metric::new("Total Jobs", batch.len()),
        Metric::new("Jobs We Can Do", can_do),
        Metric::new("Jobs We Cannot Do", batch.len() - can_do),
        Metric::new("Jobs Needing Capability Check", needs_check),
    ];
    metrics.extend(categories.categories().into_iter().map(|category| {
        let count = batch.iter().filter(|j| j.category == category).count();
        Metric::new(format!("{category} Jobs"), count)
    }));
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, category: &str, priority: i64) -> JobRecord {
        let mut job = JobRecord::new(id, category).with_can_do(priority != -1);
        job.priority = Some(priority);
        job
    }

    #[test]
    fn test_priority_summary_groups() {
        let batch = vec![
            job("a", "REPAIRS", 2),
            job("b", "SURVEY", -1),
            job("c", "HAZARD", 1),
            job("d", "REPAIRS", 2),
            job("e", "HAZARD", -1),
        ];
        let summary = priority_summary(&batch);
        let priorities: Vec<i64> = summary.iter().map(|g| g.priority).collect();
        assert_eq!(priorities, vec![-1, 1, 2]);
        assert_eq!(summary[0].job_count, 2);
        assert_eq!(summary[0].job_types_label(), "SURVEY, HAZARD");
        assert_eq!(summary[2].job_types, vec!["REPAIRS"]);
    }

    #[test]
    fn test_summary_statistics() {
        let mut batch = vec![
            job("a", "REPAIRS", 2),
            job("b", "SURVEY", -1),
            job("c", "HAZARD", 1),
        ];
        batch[0].needs_capability_check = true;

        let metrics = summary_statistics(&batch, &CategoryRanks::default());
        let pairs: Vec<(&str, usize)> = metrics.iter().map(|m| (m.name.as_str(), m.count)).collect();
        assert_eq!(
            pairs,
            vec![
                ("Total Jobs", 3),
                ("Jobs We Can Do", 2),
                ("Jobs We Cannot Do", 1),
                ("Jobs Needing Capability Check", 1),
                ("HAZARD Jobs", 1),
                ("REPAIRS Jobs", 1),
                ("SURVEY Jobs", 1),
            ]
        );
    }
}
