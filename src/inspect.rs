//! Input checks and date-range statistics for the `validate` and
//! `date-range` commands.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};

use crate::capability::check_capability;
use crate::config::{CapabilityColumns, JobColumns};
use crate::loader::RawTable;
use crate::ranking::JobRecord;
use crate::timestamp::parse_due;

/// Number of due values and capability values sampled.
const SAMPLE_ROWS: usize = 5;

/// Parse outcome for one sampled due value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueSample {
    pub raw: String,
    pub parsed: Option<NaiveDateTime>,
}

/// Findings for a jobs table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobsCheck {
    pub rows: usize,
    pub headers: Vec<String>,
    pub missing_columns: Vec<String>,
    /// Distinct job types, first-seen order.
    pub job_types: Vec<String>,
    /// First due values and whether they parse.
    pub due_samples: Vec<DueSample>,
    /// Columns with blank cells, with their count.
    pub blank_cells: Vec<(String, usize)>,
}

impl JobsCheck {
    /// No missing columns and every sampled due value parses.
    pub fn is_ok(&self) -> bool {
        self.missing_columns.is_empty() && self.due_samples.iter().all(|s| s.parsed.is_some())
    }
}

fn blank_cells(table: &RawTable) -> Vec<(String, usize)> {
    table
        .headers
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| {
            let blanks = table.values(idx).filter(|v| v.trim().is_empty()).count();
            (blanks > 0).then(|| (name.clone(), blanks))
        })
        .collect()
}

/// Checks a jobs table without failing on the first problem.
pub fn check_jobs_table(table: &RawTable, columns: &JobColumns) -> JobsCheck {
    let mut job_types: Vec<String> = Vec::new();
    if let Some(idx) = table.column(&columns.parent_job_type) {
        for value in table.values(idx) {
            if !job_types.iter().any(|t| t == value) {
                job_types.push(value.to_string());
            }
        }
    }

    let due_samples = table
        .column(&columns.due)
        .map(|idx| {
            table
                .values(idx)
                .take(SAMPLE_ROWS)
                .map(|raw| DueSample {
                    raw: raw.to_string(),
                    parsed: parse_due(raw).ok(),
                })
                .collect()
        })
        .unwrap_or_default();

    JobsCheck {
        rows: table.len(),
        headers: table.headers.clone(),
        missing_columns: table.missing_columns(columns.required()),
        job_types,
        due_samples,
        blank_cells: blank_cells(table),
    }
}

/// Findings for a capability table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityCheck {
    pub rows: usize,
    pub headers: Vec<String>,
    pub missing_columns: Vec<String>,
    /// Values meaning "cannot do" (blank or `NONE`).
    pub cannot_do_values: usize,
    /// Values containing `<` or `>`.
    pub conditional_values: usize,
    /// First non-blank values.
    pub samples: Vec<String>,
}

impl CapabilityCheck {
    pub fn is_ok(&self) -> bool {
        self.missing_columns.is_empty()
    }
}

/// Checks a capability table.
pub fn check_capability_table(table: &RawTable, columns: &CapabilityColumns) -> CapabilityCheck {
    let mut check = CapabilityCheck {
        rows: table.len(),
        headers: table.headers.clone(),
        missing_columns: table.missing_columns([
            columns.job_code.as_str(),
            columns.capability_internal.as_str(),
        ]),
        ..CapabilityCheck::default()
    };

    if let Some(idx) = table.column(&columns.capability_internal) {
        for value in table.values(idx) {
            let flags = check_capability(Some(value));
            check.cannot_do_values += usize::from(!flags.can_do);
            check.conditional_values += usize::from(flags.needs_check);
        }
        check.samples = table
            .values(idx)
            .filter(|v| !v.trim().is_empty())
            .take(SAMPLE_ROWS * 2)
            .map(str::to_string)
            .collect();
    }
    check
}

/// Due-date spread of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub earliest: NaiveDateTime,
    pub latest: NaiveDateTime,
    /// Whole days between earliest and latest.
    pub span_days: i64,
    /// Job count per `(year, month)`.
    pub per_month: BTreeMap<(i32, u32), usize>,
}

/// Computes the due-date spread. `None` if no job has a due instant.
pub fn date_range(jobs: &[JobRecord]) -> Option<DateRange> {
    let dues: Vec<NaiveDateTime> = jobs.iter().filter_map(|j| j.due_instant).collect();
    let earliest = *dues.iter().min()?;
    let latest = *dues.iter().max()?;

    let mut per_month: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for due in &dues {
        *per_month.entry((due.year(), due.month())).or_default() += 1;
    }

    Some(DateRange {
        earliest,
        latest,
        span_days: (latest - earliest).num_days(),
        per_month,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::parse_due;

    #[test]
    fn test_check_jobs_table() {
        let csv = "\
JobID,Parent Job Type,Location,Road,Standard Job,Due
J1,HAZARD,L1,,RM1,01/07/2024
J2,SURVEY,L2,R2,RM2,not a date
J3,HAZARD,L3,,RM1,2024-07-03
";
        let table = RawTable::read(csv.as_bytes(), "jobs").unwrap();
        let check = check_jobs_table(&table, &JobColumns::default());

        assert_eq!(check.rows, 3);
        assert!(check.missing_columns.is_empty());
        assert_eq!(check.job_types, vec!["HAZARD", "SURVEY"]);
        assert_eq!(check.due_samples.len(), 3);
        assert!(check.due_samples[1].parsed.is_none());
        assert_eq!(check.blank_cells, vec![("Road".to_string(), 2)]);
        assert!(!check.is_ok());
    }

    #[test]
    fn test_check_jobs_missing_columns() {
        let table = RawTable::read("JobID\nJ1\n".as_bytes(), "jobs").unwrap();
        let check = check_jobs_table(&table, &JobColumns::default());
        assert_eq!(check.missing_columns.len(), 5);
        assert!(check.due_samples.is_empty());
        assert!(!check.is_ok());
    }

    #[test]
    fn test_check_capability_table() {
        let csv = "Job Code,Capability Internal\nRM1,Yes\nRM2,NONE\nRM3,\nRM4,<60\n";
        let table = RawTable::read(csv.as_bytes(), "capability").unwrap();
        let check = check_capability_table(&table, &CapabilityColumns::default());
        assert!(check.is_ok());
        assert_eq!(check.cannot_do_values, 2);
        assert_eq!(check.conditional_values, 1);
        assert_eq!(check.samples, vec!["Yes", "NONE", "<60"]);
    }

    #[test]
    fn test_date_range() {
        let jobs = vec![
            JobRecord::new("a", "HAZARD").with_due(parse_due("2024-07-30").unwrap()),
            JobRecord::new("b", "HAZARD").with_due(parse_due("2024-07-01").unwrap()),
            JobRecord::new("c", "HAZARD").with_due(parse_due("2024-09-10").unwrap()),
            JobRecord::new("d", "HAZARD"),
        ];
        let range = date_range(&jobs).unwrap();
        assert_eq!(range.earliest, parse_due("2024-07-01").unwrap());
        assert_eq!(range.latest, parse_due("2024-09-10").unwrap());
        assert_eq!(range.span_days, 71);
        assert_eq!(range.per_month.get(&(2024, 7)), Some(&2));
        assert_eq!(range.per_month.get(&(2024, 9)), Some(&1));
        assert_eq!(range.per_month.len(), 2);
    }

    #[test]
    fn test_date_range_empty() {
        assert!(date_range(&[JobRecord::new("a", "HAZARD")]).is_none());
    }
}
