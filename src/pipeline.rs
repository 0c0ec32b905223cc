//! End-to-end prioritization run.
//!
//! # Stages
//!
//! 1. Load the jobs, capability and (optional) LGA mapping tables
//! 2. Keep jobs due on or after the reference date
//! 3. Resolve internal capability per job
//! 4. Map LGAs to Areas
//! 5. Assign priorities
//! 6. Write the report and summary

use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::info;

use crate::area::{AreaMap, AreaMatchStats};
use crate::capability::CapabilityTable;
use crate::config::PriorityConfig;
use crate::error::{PriorityError, Result};
use crate::filter::filter_by_due;
use crate::loader;
use crate::ranking::{JobRecord, PriorityEngine, RankingStats};
use crate::report::{
    build_report, priority_summary, summary_path, summary_statistics, write_report, write_summary,
    Metric, PriorityGroup, ReportRow,
};

/// A ranked batch with per-stage counts.
#[derive(Debug, Clone)]
pub struct Prioritized {
    /// Jobs before date filtering.
    pub loaded: usize,
    /// Ranked jobs, in filtered input order.
    pub jobs: Vec<JobRecord>,
    pub ranking: RankingStats,
    /// `None` when no LGA mapping was supplied.
    pub areas: Option<AreaMatchStats>,
}

/// Filters, annotates and ranks an in-memory batch.
pub fn prioritize(
    jobs: Vec<JobRecord>,
    capability: &CapabilityTable,
    area_map: Option<&AreaMap>,
    reference: NaiveDateTime,
    config: &PriorityConfig,
) -> Result<Prioritized> {
    let engine = PriorityEngine::new(config.categories.clone())?;
    let loaded = jobs.len();

    let mut jobs = filter_by_due(jobs, reference);
    capability.annotate(&mut jobs);
    let areas = area_map.map(|map| map.annotate(&mut jobs));
    let ranking = engine.assign(&mut jobs)?;
    info!(
        eligible = ranking.eligible,
        excluded = ranking.excluded,
        priorities = ranking.distinct_priorities,
        "Priorities assigned"
    );

    Ok(Prioritized {
        loaded,
        jobs,
        ranking,
        areas,
    })
}

/// File locations and reference date for [`run`].
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub jobs: PathBuf,
    pub capability: PathBuf,
    pub area_map: Option<PathBuf>,
    pub reference: NaiveDateTime,
    pub output: PathBuf,
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub prioritized: Prioritized,
    pub rows: Vec<ReportRow>,
    pub groups: Vec<PriorityGroup>,
    pub metrics: Vec<Metric>,
    /// Set when a summary file was written.
    pub summary_path: Option<PathBuf>,
}

/// Loads the inputs, ranks the jobs and writes the output files.
pub fn run(inputs: &RunInputs, config: &PriorityConfig) -> Result<RunReport> {
    config.validate().map_err(PriorityError::InvalidConfig)?;
    info!(reference = %inputs.reference, "Starting prioritization run");

    let jobs = loader::load_jobs(&inputs.jobs, &config.columns)?;
    let capability = loader::load_capability(&inputs.capability, &config.capability_columns)?;
    let area_map = inputs
        .area_map
        .as_deref()
        .map(|path| loader::load_area_map(path, &config.area_columns))
        .transpose()?;

    let prioritized = prioritize(
        jobs,
        &capability,
        area_map.as_ref(),
        inputs.reference,
        config,
    )?;

    let rows = build_report(&prioritized.jobs, config.tie_breaker)?;
    let groups = priority_summary(&prioritized.jobs);
    let metrics = summary_statistics(&prioritized.jobs, &config.categories);

    write_report(&inputs.output, &rows, &config.columns)?;
    let summary_file = if config.include_summary {
        let path = summary_path(&inputs.output);
        write_summary(&path, &metrics, &groups)?;
        Some(path)
    } else {
        None
    };

    info!(output = %inputs.output.display(), rows = rows.len(), "Run complete");
    Ok(RunReport {
        prioritized,
        rows,
        groups,
        metrics,
        summary_path: summary_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::parse_due;
    use std::fs;

    const JOBS: &str = "\
JobID,Parent Job Type,Location,Road,Standard Job,Due,LGA
OLD,HAZARD,Km 1,Main Rd,RM1,01/10/2025 09:00 AM,Alpha
H1,HAZARD,Km 2,Main Rd,RM1,07/11/2025 09:00 AM,Alpha
H2,HAZARD,Km 3,Main Rd,RM1,07/11/2025 09:00 AM,Beta
R1,REPAIRS,Km 4,Side Rd,RM3,06/11/2025 08:00 AM,Alpha
S1,SURVEY,Km 5,Side Rd,RM2,08/11/2025,Gamma
X1,HAZARD,Km 6,Side Rd,RM9,06/11/2025,Alpha
";

    const CAPABILITY: &str = "\
Job Code,Capability Internal
RM1,Yes
RM2,NONE
RM3,<80 only
";

    const LGA: &str = "LGA,Area\nAlpha,North\nBeta,South\n";

    #[test]
    fn test_prioritize_in_memory() {
        let config = PriorityConfig::default();
        let jobs = loader::read_jobs(JOBS.as_bytes(), &config.columns).unwrap();
        let capability =
            loader::read_capability(CAPABILITY.as_bytes(), &config.capability_columns).unwrap();

        let result = prioritize(
            jobs,
            &capability,
            None,
            parse_due("06/11/2025").unwrap(),
            &config,
        )
        .unwrap();

        assert_eq!(result.loaded, 6);
        let got: Vec<(&str, i64)> = result
            .jobs
            .iter()
            .map(|j| (j.job_id.as_str(), j.priority.unwrap()))
            .collect();
        assert_eq!(
            got,
            vec![("H1", 1), ("H2", 1), ("R1", 2), ("S1", -1), ("X1", -1)]
        );
        assert!(result.areas.is_none());
        assert_eq!(result.ranking.distinct_priorities, 2);
    }

    #[test]
    fn test_prioritize_rejects_unknown_category() {
        let config = PriorityConfig::default();
        let mut job = JobRecord::new("Q", "INSPECTION").with_standard_job("RM1");
        job.due_instant = Some(parse_due("2030-01-01").unwrap());
        let capability = CapabilityTable::new().with_entry("RM1", "Yes");

        let err = prioritize(
            vec![job],
            &capability,
            None,
            parse_due("2025-01-01").unwrap(),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, PriorityError::UnknownCategory { .. }));
    }

    #[test]
    fn test_run_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = dir.path().join("jobs.csv");
        let capability = dir.path().join("capability.csv");
        let lga = dir.path().join("lga.csv");
        fs::write(&jobs, JOBS).unwrap();
        fs::write(&capability, CAPABILITY).unwrap();
        fs::write(&lga, LGA).unwrap();

        let inputs = RunInputs {
            jobs,
            capability,
            area_map: Some(lga),
            reference: parse_due("06/11/2025").unwrap(),
            output: dir.path().join("prioritized.csv"),
        };
        let report = run(&inputs, &PriorityConfig::default()).unwrap();

        let ids: Vec<&str> = report.rows.iter().map(|r| r.job_id.as_str()).collect();
        assert_eq!(ids, vec!["H1", "H2", "R1", "S1", "X1"]);
        assert_eq!(report.rows[1].area.as_deref(), Some("South"));
        assert!(report.rows[2].needs_check);

        let areas = report.prioritized.areas.unwrap();
        assert_eq!(areas.matched, 4);
        assert_eq!(areas.unmatched, 1);

        let written = fs::read_to_string(&inputs.output).unwrap();
        assert_eq!(written.lines().count(), 6);
        assert!(written.lines().nth(1).unwrap().starts_with("1,H1,HAZARD"));

        let summary = report.summary_path.unwrap();
        assert!(fs::read_to_string(summary).unwrap().contains("Jobs We Cannot Do,2"));
    }

    #[test]
    fn test_run_without_summary() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = dir.path().join("jobs.csv");
        let capability = dir.path().join("capability.csv");
        fs::write(&jobs, JOBS).unwrap();
        fs::write(&capability, CAPABILITY).unwrap();

        let inputs = RunInputs {
            jobs,
            capability,
            area_map: None,
            reference: parse_due("01/01/2020").unwrap(),
            output: dir.path().join("out.csv"),
        };
        let config = PriorityConfig::default().with_include_summary(false);
        let report = run(&inputs, &config).unwrap();

        assert!(report.summary_path.is_none());
        assert!(!dir.path().join("out_summary.csv").exists());
        assert_eq!(report.rows.len(), 6);
    }
}
