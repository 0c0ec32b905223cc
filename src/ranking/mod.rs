//! Priority assignment engine.
//!
//! Converts an unordered batch of jobs into a dense, tie-aware priority
//! sequence:
//!
//! - Jobs that internal crews cannot do are pinned to
//!   [`CANNOT_DO_PRIORITY`] (`-1`).
//! - Remaining jobs are ranked by `(category_rank, due_instant)`. Two jobs
//!   share a priority if and only if both their category and their due
//!   instant match, and priorities run `1, 2, 3, …` without gaps.
//!
//! # Design
//!
//! The category ordering is an injected [`CategoryRanks`] value rather
//! than global state, so one process can rank with several mappings.
//! The dense-rank step ([`dense_rank`]) is separate from the sort so it
//! can be tested on its own.

mod config;
mod engine;
mod export;
mod types;

pub use config::{CategoryRanks, TieBreaker};
pub use engine::{assign_priorities, dense_rank, PriorityEngine, RankingStats};
pub use export::export_order;
pub use types::{JobRecord, RankKey, CANNOT_DO_PRIORITY};
