//! Error types shared across the crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriorityError {
    /// An eligible job carries a category with no configured rank.
    #[error("Job {job_id}: category {category:?} has no configured priority rank")]
    UnknownCategory { job_id: String, category: String },

    /// An eligible job has no resolvable due instant.
    #[error("Job {job_id}: eligible job has no resolvable due date")]
    MissingDueInstant { job_id: String },

    #[error("Unable to parse date {input:?}; supported formats include dd/mm/yyyy, dd/mm/yy and yyyy-mm-dd, with optional time")]
    DateParse { input: String },

    #[error("Missing required columns in {file}: {columns:?}")]
    MissingColumns { file: String, columns: Vec<String> },

    #[error("Worksheet {sheet:?} not found in {file}")]
    MissingSheet { file: String, sheet: String },

    /// A workbook was given to a build without the `excel` feature.
    #[error("Cannot read {file}: workbook input requires the `excel` feature")]
    UnsupportedFormat { file: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A report was requested for a job the engine has not ranked.
    #[error("Job {job_id} has no assigned priority")]
    Unranked { job_id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "excel")]
    #[error("Excel error: {0}")]
    Excel(#[from] calamine::Error),
}

pub type Result<T> = std::result::Result<T, PriorityError>;
