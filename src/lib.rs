//! Crew job prioritization.
//!
//! Takes a table of maintenance and inspection jobs plus a crew capability
//! table, and produces a ranked work list:
//!
//! - **Timestamp parsing**: heterogeneous due-date text into comparable
//!   instants ([`timestamp`]).
//! - **Date filtering**: keep jobs due on or after a reference date
//!   ([`filter`]).
//! - **Capability resolution**: whether internal crews can do each job, and
//!   whether that needs a manual check ([`capability`]).
//! - **Area mapping**: LGA → Area lookup ([`area`]).
//! - **Priority assignment**: dense ranking by job category then due
//!   instant, with jobs crews cannot do pinned to `-1` ([`ranking`]).
//! - **Reporting**: export order, summaries and CSV output ([`report`]).
//!
//! # Architecture
//!
//! [`ranking`] is pure and performs no I/O. Loading ([`loader`]),
//! configuration ([`config`]) and the end-to-end run ([`pipeline`]) sit
//! around it.

pub mod area;
pub mod capability;
pub mod config;
pub mod error;
pub mod filter;
pub mod inspect;
pub mod loader;
pub mod pipeline;
pub mod ranking;
pub mod report;
pub mod timestamp;

pub use error::{PriorityError, Result};
