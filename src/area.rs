//! LGA → Area mapping.
//!
//! LGA names are compared after removing all whitespace and uppercasing,
//! so `"North  Shire"` and `"NORTHSHIRE"` match.

use std::collections::{BTreeMap, HashMap};

use tracing::{info, warn};

use crate::ranking::JobRecord;

/// How many sample LGAs a warning lists.
const SAMPLE_LIMIT: usize = 5;

/// Normalizes an LGA name. Returns `None` if nothing is left.
///
/// # Examples
///
/// ```
/// use job_priority::area::clean_lga;
///
/// assert_eq!(clean_lga(" North\tShire "), Some("NORTHSHIRE".to_string()));
/// assert_eq!(clean_lga("  "), None);
/// ```
pub fn clean_lga(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .split_whitespace()
        .collect::<String>()
        .to_uppercase();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Outcome of [`AreaMap::annotate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaMatchStats {
    pub matched: usize,
    pub unmatched: usize,
    /// Jobs matched per area.
    pub per_area: BTreeMap<String, usize>,
}

/// Cleaned LGA → Area lookup.
#[derive(Debug, Clone, Default)]
pub struct AreaMap {
    areas: HashMap<String, String>,
}

impl AreaMap {
    /// Builds the map from `(lga, area)` rows.
    ///
    /// Rows whose LGA cleans to nothing are skipped. For duplicate LGAs the
    /// first row wins and the conflict is logged.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut areas: HashMap<String, String> = HashMap::new();
        let mut duplicates: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (lga, area) in rows {
            let Some(key) = clean_lga(&lga) else {
                continue;
            };
            match areas.get(&key) {
                Some(first) => duplicates
                    .entry(key)
                    .or_insert_with(|| vec![first.clone()])
                    .push(area),
                None => {
                    areas.insert(key, area);
                }
            }
        }

        if !duplicates.is_empty() {
            warn!(
                lgas = duplicates.len(),
                "Duplicate LGA entries in mapping, keeping first occurrence"
            );
            for (lga, candidates) in duplicates.iter().take(SAMPLE_LIMIT) {
                warn!(lga = %lga, areas = ?candidates, "Duplicate LGA");
            }
        }

        Self { areas }
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Area for a raw LGA name.
    pub fn lookup(&self, lga: &str) -> Option<&str> {
        clean_lga(lga).and_then(|key| self.areas.get(&key).map(String::as_str))
    }

    /// Sets `area` on every job from its `lga`. Jobs with no LGA, or an
    /// unmapped one, get `None`.
    pub fn annotate(&self, jobs: &mut [JobRecord]) -> AreaMatchStats {
        let mut stats = AreaMatchStats::default();
        let mut unmatched_lgas: BTreeMap<String, usize> = BTreeMap::new();

        for job in jobs.iter_mut() {
            let cleaned = job.lga.as_deref().and_then(clean_lga);
            job.area = cleaned
                .as_ref()
                .and_then(|key| self.areas.get(key))
                .cloned();
            match (&job.area, cleaned) {
                (Some(area), _) => {
                    stats.matched += 1;
                    *stats.per_area.entry(area.clone()).or_default() += 1;
                }
                (None, key) => {
                    stats.unmatched += 1;
                    if let Some(key) = key {
                        *unmatched_lgas.entry(key).or_default() += 1;
                    }
                }
            }
        }

        if stats.unmatched > 0 {
            warn!(
                jobs = stats.unmatched,
                unique_lgas = unmatched_lgas.len(),
                "Jobs without an Area mapping"
            );
            for (lga, count) in unmatched_lgas.iter().take(SAMPLE_LIMIT) {
                warn!(lga = %lga, jobs = count, "Unmatched LGA");
            }
        }
        if stats.matched > 0 {
            info!(
                jobs = stats.matched,
                areas = stats.per_area.len(),
                "Mapped jobs to Areas"
            );
        }
        stats
    }
}
