//! CSV output.

use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::info;

use super::rows::ReportRow;
use super::summary::{Metric, PriorityGroup};
use crate::config::JobColumns;
use crate::error::Result;

fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Writes the prioritized jobs table. Column headings follow `columns`.
pub fn write_report_to<W: Write>(out: W, rows: &[ReportRow], columns: &JobColumns) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record([
        "Priority",
        columns.job_id.as_str(),
        columns.parent_job_type.as_str(),
        columns.standard_job.as_str(),
        columns.location.as_str(),
        columns.due.as_str(),
        "Area",
        "Cannot_Do_Flag",
        "Capability_Check_Flag",
    ])?;
    for row in rows {
        writer.write_record([
            row.priority.to_string().as_str(),
            row.job_id.as_str(),
            row.job_type.as_str(),
            row.standard_job.as_str(),
            row.location.as_str(),
            row.due.as_str(),
            row.area.as_deref().unwrap_or(""),
            flag(row.cannot_do),
            flag(row.needs_check),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the summary table: batch metrics, a blank line, then one line
/// per priority.
pub fn write_summary_to<W: Write>(
    out: W,
    metrics: &[Metric],
    groups: &[PriorityGroup],
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);
    writer.write_record(["Metric", "Count"])?;
    for metric in metrics {
        writer.write_record([metric.name.as_str(), metric.count.to_string().as_str()])?;
    }
    writer.write_record([""])?;
    writer.write_record(["Priority", "Job Count", "Job Types"])?;
    for group in groups {
        writer.write_record([
            group.priority.to_string(),
            group.job_count.to_string(),
            group.job_types_label(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// `<dir>/<stem>_summary.csv` next to the report.
pub fn summary_path(report: &Path) -> PathBuf {
    let stem = report
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    report.with_file_name(format!("{stem}_summary.csv"))
}

/// Writes the report file.
pub fn write_report(path: &Path, rows: &[ReportRow], columns: &JobColumns) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_report_to(file, rows, columns)?;
    info!(path = %path.display(), rows = rows.len(), "Report written");
    Ok(())
}

/// Writes the summary file.
pub fn write_summary(path: &Path, metrics: &[Metric], groups: &[PriorityGroup]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_summary_to(file, metrics, groups)?;
    info!(path = %path.display(), "Summary written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(priority: i64, id: &str) -> ReportRow {
        ReportRow {
            priority,
            job_id: id.into(),
            job_type: "HAZARD".into(),
            standard_job: "RM1".into(),
            location: "Km 4, North".into(),
            due: "01/07/2024".into(),
            area: None,
            cannot_do: priority == -1,
            needs_check: false,
        }
    }

    #[test]
    fn test_report_csv() {
        let mut out = Vec::new();
        write_report_to(&mut out, &[row(1, "J1"), row(-1, "J2")], &JobColumns::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Priority,JobID,Parent Job Type,Standard Job,Location,Due,Area,Cannot_Do_Flag,Capability_Check_Flag"
        );
        assert_eq!(lines[1], "1,J1,HAZARD,RM1,\"Km 4, North\",01/07/2024,,False,False");
        assert_eq!(lines[2], "-1,J2,HAZARD,RM1,\"Km 4, North\",01/07/2024,,True,False");
    }

    #[test]
    fn test_summary_csv() {
        let metrics = vec![Metric {
            name: "Total Jobs".into(),
            count: 2,
        }];
        let groups = vec![PriorityGroup {
            priority: 1,
            job_count: 2,
            job_types: vec!["HAZARD".into(), "SURVEY".into()],
        }];
        let mut out = Vec::new();
        write_summary_to(&mut out, &metrics, &groups).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total Jobs,2"));
        assert!(text.contains("1,2,\"HAZARD, SURVEY\""));
    }

    #[test]
    fn test_summary_path() {
        assert_eq!(
            summary_path(Path::new("/tmp/out/prioritized.csv")),
            PathBuf::from("/tmp/out/prioritized_summary.csv")
        );
    }
}
