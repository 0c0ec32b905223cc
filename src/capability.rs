//! Crew capability lookup.
//!
//! The capability table maps a standard job code to free text describing
//! whether internal crews can perform it. The text is interpreted as:
//!
//! - missing, blank or `NONE` → cannot do internally
//! - contains `<` or `>` (e.g. `"<80 km/h only"`) → can do, needs a check
//! - anything else → can do

use std::collections::HashMap;

use tracing::{info, warn};

use crate::ranking::JobRecord;

/// Flags derived from one capability value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityFlags {
    pub can_do: bool,
    pub needs_check: bool,
}

impl CapabilityFlags {
    pub const CANNOT_DO: Self = Self {
        can_do: false,
        needs_check: false,
    };
}

/// Interprets a raw capability value.
///
/// # Examples
///
/// ```
/// use job_priority::capability::check_capability;
///
/// assert!(!check_capability(Some(" none ")).can_do);
/// assert!(check_capability(Some("<60")).needs_check);
/// assert!(check_capability(Some("Yes")).can_do);
/// assert!(!check_capability(None).can_do);
/// ```
pub fn check_capability(value: Option<&str>) -> CapabilityFlags {
    let Some(raw) = value else {
        return CapabilityFlags::CANNOT_DO;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("NONE") {
        return CapabilityFlags::CANNOT_DO;
    }
    CapabilityFlags {
        can_do: true,
        needs_check: trimmed.contains('<') || trimmed.contains('>'),
    }
}

/// Job code → raw capability value.
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    entries: HashMap<String, String>,
}

impl CapabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(job_code, capability)` rows.
    ///
    /// The first row for a job code wins; later duplicates are logged and
    /// ignored.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut table = Self::new();
        let mut duplicates = 0usize;
        for (code, value) in rows {
            if table.entries.contains_key(&code) {
                duplicates += 1;
                continue;
            }
            table.entries.insert(code, value);
        }
        if duplicates > 0 {
            warn!(duplicates, "Duplicate job codes in capability table, keeping first");
        }
        table
    }

    pub fn with_entry(mut self, code: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(code.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw capability value for a job code, if listed.
    pub fn value(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    /// Resolves a job code. Codes absent from the table cannot be done.
    pub fn resolve(&self, code: &str) -> CapabilityFlags {
        check_capability(self.value(code))
    }

    /// Writes `can_do_internally` and `needs_capability_check` on every job,
    /// keyed by its standard job code.
    pub fn annotate(&self, jobs: &mut [JobRecord]) {
        let mut cannot_do = 0usize;
        let mut needs_check = 0usize;
        for job in jobs.iter_mut() {
            let flags = self.resolve(&job.standard_job);
            job.can_do_internally = flags.can_do;
            job.needs_capability_check = flags.needs_check;
            cannot_do += usize::from(!flags.can_do);
            needs_check += usize::from(flags.needs_check);
        }
        info!(cannot_do, needs_check, "Capability checked");
    }
}
