//! Loaders for the jobs, capability and LGA mapping tables.
//!
//! Every table is read with a header row. Columns are located by name, so
//! column order and extra columns do not matter. Files ending in `.csv` are
//! read as CSV; anything else is opened as a workbook, which needs the
//! `excel` feature.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::info;

use crate::area::AreaMap;
use crate::capability::CapabilityTable;
use crate::config::{AreaColumns, CapabilityColumns, JobColumns};
use crate::error::{PriorityError, Result};
use crate::ranking::JobRecord;
use crate::timestamp::parse_optional_due;

/// Table file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Excel,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Excel,
        }
    }
}

/// A header row plus raw string records.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Name used in error messages.
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl RawTable {
    /// Reads a CSV document.
    pub fn read<R: Read>(reader: R, source: impl Into<String>) -> Result<Self> {
        let mut csv = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
        let rows = csv.records().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            source: source.into(),
            headers,
            rows,
        })
    }

    /// Opens and reads a CSV file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::read(file, path.display().to_string())
    }

    /// Opens a CSV file or a workbook sheet, depending on the extension.
    ///
    /// `sheet` selects the worksheet of a workbook; `None` takes the first
    /// one. CSV files ignore it.
    pub fn load(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        match TableFormat::from_path(path) {
            TableFormat::Csv => Self::open(path),
            TableFormat::Excel => Self::open_workbook(path, sheet),
        }
    }

    /// Reads one worksheet of an `.xlsx`/`.xls`/`.ods` workbook.
    #[cfg(feature = "excel")]
    pub fn open_workbook(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<Self> {
        use calamine::{open_workbook_auto, Reader};

        let path = path.as_ref();
        let source = path.display().to_string();
        let mut workbook = open_workbook_auto(path)?;

        let names = workbook.sheet_names();
        let name = match sheet {
            Some(wanted) => names.iter().find(|name| name.as_str() == wanted),
            None => names.first(),
        }
        .cloned()
        .ok_or_else(|| PriorityError::MissingSheet {
            file: source.clone(),
            sheet: sheet.unwrap_or("<first>").to_string(),
        })?;

        let range = workbook.worksheet_range(&name)?;
        let mut rows = range
            .rows()
            .map(|row| row.iter().map(excel_cell_text).collect::<Vec<String>>());
        let headers = rows.next().unwrap_or_default();
        let rows: Vec<StringRecord> = rows.map(StringRecord::from).collect();
        tracing::debug!(file = %source, sheet = %name, rows = rows.len(), "Read worksheet");

        Ok(Self {
            source,
            headers,
            rows,
        })
    }

    /// Reads one worksheet of a workbook.
    #[cfg(not(feature = "excel"))]
    pub fn open_workbook(path: impl AsRef<Path>, _sheet: Option<&str>) -> Result<Self> {
        Err(PriorityError::UnsupportedFormat {
            file: path.as_ref().display().to_string(),
        })
    }

    /// Index of a column by exact name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Names from `required` that are not in the header row.
    pub fn missing_columns<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        required
            .into_iter()
            .filter(|name| self.column(name).is_none())
            .map(str::to_string)
            .collect()
    }

    /// Fails with [`PriorityError::MissingColumns`] if any column is absent.
    pub fn require_columns<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let columns = self.missing_columns(required);
        if columns.is_empty() {
            Ok(())
        } else {
            Err(PriorityError::MissingColumns {
                file: self.source.clone(),
                columns,
            })
        }
    }

    /// Column index, or [`PriorityError::MissingColumns`].
    fn index_of(&self, name: &str) -> Result<usize> {
        self.column(name).ok_or_else(|| PriorityError::MissingColumns {
            file: self.source.clone(),
            columns: vec![name.to_string()],
        })
    }

    /// Values of one column, empty string for short rows.
    pub fn values<'a>(&'a self, idx: usize) -> impl Iterator<Item = &'a str> + 'a {
        self.rows.iter().map(move |row| row.get(idx).unwrap_or(""))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Renders a worksheet cell the way a CSV export would show it.
///
/// Date cells become `yyyy-mm-dd HH:MM:SS` so the due parser accepts them,
/// and whole-number floats lose their `.0`.
#[cfg(feature = "excel")]
fn excel_cell_text(cell: &calamine::Data) -> String {
    use calamine::{Data, DataType};

    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

fn cell(row: &StringRecord, idx: usize) -> String {
    row.get(idx).unwrap_or("").to_string()
}

/// Converts a jobs table into records.
///
/// Due text is parsed here; an unparsable due date fails the load. Blank
/// due cells yield a job without a due instant. The LGA column is optional.
pub fn jobs_from_table(table: &RawTable, columns: &JobColumns) -> Result<Vec<JobRecord>> {
    table.require_columns(columns.required())?;

    let job_id = table.index_of(&columns.job_id)?;
    let category = table.index_of(&columns.parent_job_type)?;
    let location = table.index_of(&columns.location)?;
    let road = table.index_of(&columns.road)?;
    let standard_job = table.index_of(&columns.standard_job)?;
    let due = table.index_of(&columns.due)?;
    let lga = table.column(&columns.lga);

    table
        .rows
        .iter()
        .map(|row| -> Result<JobRecord> {
            let due_raw = cell(row, due);
            let mut job = JobRecord::new(cell(row, job_id), cell(row, category));
            job.due_instant = parse_optional_due(&due_raw)?;
            job.due_raw = due_raw;
            job.location = cell(row, location);
            job.road = cell(row, road);
            job.standard_job = cell(row, standard_job);
            job.lga = lga
                .map(|idx| cell(row, idx))
                .filter(|value| !value.trim().is_empty());
            Ok(job)
        })
        .collect()
}

/// Reads jobs from any CSV source.
pub fn read_jobs<R: Read>(reader: R, columns: &JobColumns) -> Result<Vec<JobRecord>> {
    let table = RawTable::read(reader, "jobs")?;
    jobs_from_table(&table, columns)
}

/// Loads the jobs file, CSV or the first sheet of a workbook.
pub fn load_jobs(path: impl AsRef<Path>, columns: &JobColumns) -> Result<Vec<JobRecord>> {
    let table = RawTable::load(path, None)?;
    let jobs = jobs_from_table(&table, columns)?;
    info!(file = %table.source, jobs = jobs.len(), "Loaded jobs");
    Ok(jobs)
}

/// Converts a capability table into a lookup.
pub fn capability_from_table(
    table: &RawTable,
    columns: &CapabilityColumns,
) -> Result<CapabilityTable> {
    table.require_columns([columns.job_code.as_str(), columns.capability_internal.as_str()])?;
    let code = table.index_of(&columns.job_code)?;
    let value = table.index_of(&columns.capability_internal)?;

    Ok(CapabilityTable::from_rows(
        table.rows.iter().map(|row| (cell(row, code), cell(row, value))),
    ))
}

pub fn read_capability<R: Read>(reader: R, columns: &CapabilityColumns) -> Result<CapabilityTable> {
    let table = RawTable::read(reader, "capability")?;
    capability_from_table(&table, columns)
}

/// Loads the capability file, CSV or the configured sheet of a workbook.
pub fn load_capability(
    path: impl AsRef<Path>,
    columns: &CapabilityColumns,
) -> Result<CapabilityTable> {
    let table = RawTable::load(path, Some(&columns.sheet))?;
    let capability = capability_from_table(&table, columns)?;
    info!(file = %table.source, codes = capability.len(), "Loaded capability table");
    Ok(capability)
}

/// Converts an LGA mapping table into a lookup.
pub fn area_map_from_table(table: &RawTable, columns: &AreaColumns) -> Result<AreaMap> {
    table.require_columns([columns.lga.as_str(), columns.area.as_str()])?;
    let lga = table.index_of(&columns.lga)?;
    let area = table.index_of(&columns.area)?;

    Ok(AreaMap::from_rows(
        table.rows.iter().map(|row| (cell(row, lga), cell(row, area))),
    ))
}

pub fn read_area_map<R: Read>(reader: R, columns: &AreaColumns) -> Result<AreaMap> {
    let table = RawTable::read(reader, "lga mapping")?;
    area_map_from_table(&table, columns)
}

/// Loads the LGA mapping file, CSV or the first sheet of a workbook.
pub fn load_area_map(path: impl AsRef<Path>, columns: &AreaColumns) -> Result<AreaMap> {
    let table = RawTable::load(path, None)?;
    let map = area_map_from_table(&table, columns)?;
    info!(file = %table.source, lgas = map.len(), "Loaded LGA mapping");
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use std::io::Write;

    const JOBS_CSV: &str = "\
JobID,Parent Job Type,Location,Road,Standard Job,Due,LGA
J1,HAZARD,Km 12,Main Rd,RM1,01/07/2024 11:26 AM,North Shire
J2,SURVEY,Km 3,Side Rd,RM2,2024-07-02,
J3,REPAIRS,Km 9,Main Rd,RM3,,Gamma
";

    #[test]
    fn test_read_jobs() {
        let jobs = read_jobs(JOBS_CSV.as_bytes(), &JobColumns::default()).unwrap();
        assert_eq!(jobs.len(), 3);

        let j1 = &jobs[0];
        assert_eq!(j1.job_id, "J1");
        assert_eq!(j1.category, "HAZARD");
        assert_eq!(j1.standard_job, "RM1");
        assert_eq!(j1.road, "Main Rd");
        assert_eq!(j1.due_raw, "01/07/2024 11:26 AM");
        assert_eq!(j1.due_instant.unwrap().hour(), 11);
        assert_eq!(j1.lga.as_deref(), Some("North Shire"));
        assert!(j1.priority.is_none());

        assert_eq!(
            jobs[1].due_instant.unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 7, 2).unwrap()
        );
        assert_eq!(jobs[1].lga, None);
        assert_eq!(jobs[2].due_instant, None);
    }

    #[test]
    fn test_missing_columns_listed() {
        let csv = "JobID,Due\nJ1,2024-01-01\n";
        match read_jobs(csv.as_bytes(), &JobColumns::default()) {
            Err(PriorityError::MissingColumns { columns, .. }) => {
                assert_eq!(
                    columns,
                    vec!["Parent Job Type", "Location", "Road", "Standard Job"]
                );
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_due_fails_load() {
        let csv = "JobID,Parent Job Type,Location,Road,Standard Job,Due\nJ1,HAZARD,L,R,RM1,soon\n";
        assert!(matches!(
            read_jobs(csv.as_bytes(), &JobColumns::default()),
            Err(PriorityError::DateParse { .. })
        ));
    }

    #[test]
    fn test_lga_column_optional() {
        let csv = "JobID,Parent Job Type,Location,Road,Standard Job,Due\nJ1,HAZARD,L,R,RM1,2024-01-01\n";
        let jobs = read_jobs(csv.as_bytes(), &JobColumns::default()).unwrap();
        assert_eq!(jobs[0].lga, None);
    }

    #[test]
    fn test_read_capability() {
        let csv = "Job Code,Description,Capability Internal\nRM1,Pothole,Yes\nRM2,Bridge,NONE\nRM3,Signs,\n";
        let table = read_capability(csv.as_bytes(), &CapabilityColumns::default()).unwrap();
        assert!(table.resolve("RM1").can_do);
        assert!(!table.resolve("RM2").can_do);
        assert!(!table.resolve("RM3").can_do);
    }

    #[test]
    fn test_read_area_map() {
        let csv = "LGA,Area\nNorth Shire,North\n";
        let map = read_area_map(csv.as_bytes(), &AreaColumns::default()).unwrap();
        assert_eq!(map.lookup("NORTHSHIRE"), Some("North"));
    }

    #[test]
    fn test_load_jobs_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(JOBS_CSV.as_bytes()).unwrap();
        let jobs = load_jobs(file.path(), &JobColumns::default()).unwrap();
        assert_eq!(jobs.len(), 3);
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            RawTable::open("/definitely/not/here.csv"),
            Err(PriorityError::Io(_))
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(TableFormat::from_path(Path::new("jobs.csv")), TableFormat::Csv);
        assert_eq!(TableFormat::from_path(Path::new("JOBS.CSV")), TableFormat::Csv);
        assert_eq!(
            TableFormat::from_path(Path::new("RM Codes Crew Capability.xlsx")),
            TableFormat::Excel
        );
        assert_eq!(TableFormat::from_path(Path::new("jobs")), TableFormat::Excel);
    }

    #[test]
    fn test_load_dispatches_csv_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        file.write_all(JOBS_CSV.as_bytes()).unwrap();
        let table = RawTable::load(file.path(), Some("ignored")).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("Due"), Some(5));
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[cfg(not(feature = "excel"))]
    #[test]
    fn test_workbook_needs_excel_feature() {
        assert!(matches!(
            load_jobs(fixture("jobs.xlsx"), &JobColumns::default()),
            Err(PriorityError::UnsupportedFormat { .. })
        ));
    }

    #[cfg(feature = "excel")]
    #[test]
    fn test_load_jobs_from_workbook() {
        let jobs = load_jobs(fixture("jobs.xlsx"), &JobColumns::default()).unwrap();
        assert_eq!(jobs.len(), 3);

        // Date-formatted cell.
        let j1 = jobs[0].due_instant.unwrap();
        assert_eq!(j1.date(), NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!((j1.hour(), j1.minute()), (11, 26));
        assert_eq!(jobs[0].lga.as_deref(), Some("North Shire"));

        // Text cell in the day-first format.
        assert_eq!(jobs[1].due_instant.unwrap().hour(), 9);
        assert_eq!(jobs[1].lga, None);

        // Numeric job id keeps no decimal part.
        assert_eq!(jobs[2].job_id, "1003");
        assert_eq!(jobs[2].category, "REPAIRS");
    }

    #[cfg(feature = "excel")]
    #[test]
    fn test_load_capability_from_named_sheet() {
        let table =
            load_capability(fixture("capability.xlsx"), &CapabilityColumns::default()).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.resolve("RM1").can_do);
        assert!(!table.resolve("RM2").can_do);
        assert!(table.resolve("RM3").needs_check);
    }

    #[cfg(feature = "excel")]
    #[test]
    fn test_missing_sheet_reported() {
        let columns = CapabilityColumns {
            sheet: "Nope".into(),
            ..CapabilityColumns::default()
        };
        match load_capability(fixture("capability.xlsx"), &columns) {
            Err(PriorityError::MissingSheet { sheet, .. }) => assert_eq!(sheet, "Nope"),
            other => panic!("expected MissingSheet, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_table_values() {
        let table = RawTable::read("A,B\n1,2\n3\n".as_bytes(), "t").unwrap();
        let b: Vec<&str> = table.values(1).collect();
        assert_eq!(b, vec!["2", ""]);
        assert_eq!(table.missing_columns(["A", "C"]), vec!["C"]);
    }
}
