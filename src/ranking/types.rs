//! Job records and the composite ranking key.

use chrono::NaiveDateTime;

/// Priority assigned to every job that internal crews cannot perform.
///
/// Never produced by the dense-ranking pass itself.
pub const CANNOT_DO_PRIORITY: i64 = -1;

/// A single maintenance or inspection job.
///
/// Only `category`, `due_instant` and `can_do_internally` drive ranking.
/// The remaining attributes are carried through to the report untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub job_id: String,
    /// Parent job type, e.g. `HAZARD`. Matched case-exactly.
    pub category: String,
    /// Parsed due instant. `None` when the due text was absent.
    pub due_instant: Option<NaiveDateTime>,
    /// Due text as it appeared in the source table.
    pub due_raw: String,
    pub can_do_internally: bool,
    pub needs_capability_check: bool,
    /// Output of the engine. `None` until ranked.
    pub priority: Option<i64>,
    pub standard_job: String,
    pub location: String,
    pub road: String,
    pub lga: Option<String>,
    pub area: Option<String>,
}

impl JobRecord {
    /// Creates an eligible, unranked job with empty pass-through attributes.
    pub fn new(job_id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            category: category.into(),
            due_instant: None,
            due_raw: String::new(),
            can_do_internally: true,
            needs_capability_check: false,
            priority: None,
            standard_job: String::new(),
            location: String::new(),
            road: String::new(),
            lga: None,
            area: None,
        }
    }

    pub fn with_due(mut self, due: NaiveDateTime) -> Self {
        self.due_instant = Some(due);
        self
    }

    pub fn with_can_do(mut self, can_do: bool) -> Self {
        self.can_do_internally = can_do;
        self
    }

    pub fn with_standard_job(mut self, code: impl Into<String>) -> Self {
        self.standard_job = code.into();
        self
    }

    pub fn with_lga(mut self, lga: impl Into<String>) -> Self {
        self.lga = Some(lga.into());
        self
    }

    /// Returns `true` if this job was pinned to [`CANNOT_DO_PRIORITY`].
    pub fn is_excluded(&self) -> bool {
        self.priority == Some(CANNOT_DO_PRIORITY)
    }
}

/// Composite ordering key `(category_rank, due_instant)`.
///
/// The derived `Ord` compares `category_rank` first, then `due_instant`,
/// and the derived `Eq` is component-wise. Sorting and tie detection both
/// go through this one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RankKey {
    pub category_rank: u32,
    pub due_instant: NaiveDateTime,
}

impl RankKey {
    pub fn new(category_rank: u32, due_instant: NaiveDateTime) -> Self {
        Self {
            category_rank,
            due_instant,
        }
    }
}
