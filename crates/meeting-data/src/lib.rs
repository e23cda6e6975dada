//! Data pipeline for the meeting analyzer.
//!
//! Responsible for reading calendar CSV exports, filtering rows to the
//! analysis window and exclusion list, and aggregating the result into
//! per-month meeting load statistics.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod reader;

pub use meeting_core as core;
