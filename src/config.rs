//! Run configuration.
//!
//! Everything has a default, so an empty TOML document is a valid
//! configuration.
//!
//! ```toml
//! tie_breaker = "by_job_id"
//! include_summary = true
//!
//! [categories]
//! HAZARD = 1
//! REPAIRS = 2
//! SURVEY = 3
//!
//! [columns]
//! job_id = "JobID"
//! due = "Due"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PriorityError, Result};
use crate::ranking::{CategoryRanks, TieBreaker};

/// Column names of the jobs table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobColumns {
    pub job_id: String,
    pub parent_job_type: String,
    pub location: String,
    pub road: String,
    pub standard_job: String,
    pub due: String,
    /// Optional; area mapping is skipped when the column is absent.
    pub lga: String,
}

impl Default for JobColumns {
    fn default() -> Self {
        Self {
            job_id: "JobID".into(),
            parent_job_type: "Parent Job Type".into(),
            location: "Location".into(),
            road: "Road".into(),
            standard_job: "Standard Job".into(),
            due: "Due".into(),
            lga: "LGA".into(),
        }
    }
}

impl JobColumns {
    /// Columns that must be present in every jobs table.
    pub fn required(&self) -> [&str; 6] {
        [
            self.job_id.as_str(),
            self.parent_job_type.as_str(),
            self.location.as_str(),
            self.road.as_str(),
            self.standard_job.as_str(),
            self.due.as_str(),
        ]
    }
}

/// Column names of the capability table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityColumns {
    pub job_code: String,
    pub capability_internal: String,
    /// Worksheet read when the capability table is a workbook.
    pub sheet: String,
}

impl Default for CapabilityColumns {
    fn default() -> Self {
        Self {
            job_code: "Job Code".into(),
            capability_internal: "Capability Internal".into(),
            sheet: "Sheet1 (2)".into(),
        }
    }
}

/// Column names of the LGA mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaColumns {
    pub lga: String,
    pub area: String,
}

impl Default for AreaColumns {
    fn default() -> Self {
        Self {
            lga: "LGA".into(),
            area: "Area".into(),
        }
    }
}

/// Configuration for a prioritization run.
///
/// # Examples
///
/// ```
/// use job_priority::config::PriorityConfig;
/// use job_priority::ranking::{CategoryRanks, TieBreaker};
///
/// let config = PriorityConfig::default()
///     .with_categories(CategoryRanks::default().with_category("INSPECTION", 4))
///     .with_tie_breaker(TieBreaker::ByJobId);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityConfig {
    /// Category → rank. Lower rank = higher priority.
    pub categories: CategoryRanks,

    pub columns: JobColumns,

    pub capability_columns: CapabilityColumns,

    pub area_columns: AreaColumns,

    /// Output order among jobs sharing a priority.
    pub tie_breaker: TieBreaker,

    /// Whether to write the summary table next to the report.
    pub include_summary: bool,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            categories: CategoryRanks::default(),
            columns: JobColumns::default(),
            capability_columns: CapabilityColumns::default(),
            area_columns: AreaColumns::default(),
            tie_breaker: TieBreaker::default(),
            include_summary: true,
        }
    }
}

impl PriorityConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate().map_err(PriorityError::InvalidConfig)?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn with_categories(mut self, categories: CategoryRanks) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_columns(mut self, columns: JobColumns) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_tie_breaker(mut self, tb: TieBreaker) -> Self {
        self.tie_breaker = tb;
        self
    }

    pub fn with_include_summary(mut self, include: bool) -> Self {
        self.include_summary = include;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.categories.validate()?;
        let mut names: Vec<&str> = self.columns.required().to_vec();
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err("job column names must not be empty".into());
        }
        names.sort_unstable();
        if names.windows(2).any(|w| w[0] == w[1]) {
            return Err("job column names must be distinct".into());
        }
        if self.capability_columns.job_code.trim().is_empty()
            || self.capability_columns.capability_internal.trim().is_empty()
        {
            return Err("capability column names must not be empty".into());
        }
        if self.capability_columns.sheet.trim().is_empty() {
            return Err("capability sheet name must not be empty".into());
        }
        if self.area_columns.lga.trim().is_empty() || self.area_columns.area.trim().is_empty() {
            return Err("area column names must not be empty".into());
        }
        Ok(())
    }
}
