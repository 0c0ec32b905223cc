//! Category ordering and tie-breaking configuration.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Mapping from job category to its priority rank.
///
/// Lower rank = higher priority. Categories are matched case-exactly.
///
/// # Examples
///
/// ```
/// use job_priority::ranking::CategoryRanks;
///
/// let ranks = CategoryRanks::empty()
///     .with_category("HAZARD", 1)
///     .with_category("SURVEY", 2);
///
/// assert_eq!(ranks.rank_of("HAZARD"), Some(1));
/// assert_eq!(ranks.rank_of("hazard"), None);
/// assert!(ranks.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRanks {
    ranks: BTreeMap<String, u32>,
}

impl Default for CategoryRanks {
    /// `HAZARD > REPAIRS > SURVEY`.
    fn default() -> Self {
        Self::empty()
            .with_category("HAZARD", 1)
            .with_category("REPAIRS", 2)
            .with_category("SURVEY", 3)
    }
}

impl CategoryRanks {
    /// Creates a mapping with no categories.
    pub fn empty() -> Self {
        Self {
            ranks: BTreeMap::new(),
        }
    }

    /// Adds or replaces a category rank.
    pub fn with_category(mut self, category: impl Into<String>, rank: u32) -> Self {
        self.ranks.insert(category.into(), rank);
        self
    }

    /// Returns the rank of `category`, or `None` if it is not configured.
    pub fn rank_of(&self, category: &str) -> Option<u32> {
        self.ranks.get(category).copied()
    }

    /// Returns the number of configured categories.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Category names sorted by ascending rank.
    pub fn categories(&self) -> Vec<&str> {
        let mut entries: Vec<(&str, u32)> =
            self.ranks.iter().map(|(c, r)| (c.as_str(), *r)).collect();
        entries.sort_by_key(|&(c, r)| (r, c));
        entries.into_iter().map(|(c, _)| c).collect()
    }

    /// Validates the mapping.
    ///
    /// Two categories sharing a rank would make jobs of different
    /// categories tie, so ranks must be distinct.
    pub fn validate(&self) -> Result<(), String> {
        if self.ranks.is_empty() {
            return Err("at least one category rank must be configured".into());
        }
        let mut seen: HashMap<u32, &str> = HashMap::with_capacity(self.ranks.len());
        for (category, &rank) in &self.ranks {
            if category.trim().is_empty() {
                return Err("category names must not be empty".into());
            }
            if rank == 0 {
                return Err(format!("rank for {category} must be positive, got 0"));
            }
            if let Some(other) = seen.insert(rank, category) {
                return Err(format!(
                    "categories {other} and {category} share rank {rank}"
                ));
            }
        }
        Ok(())
    }
}

/// Output order among jobs that share a priority.
///
/// Priority values never depend on this setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreaker {
    /// Keep the input order (stable sort).
    #[default]
    PreserveOrder,

    /// Order tied jobs by job id (deterministic regardless of input order).
    ByJobId,
}
