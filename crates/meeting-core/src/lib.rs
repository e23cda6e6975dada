//! Domain types and shared utilities for the meeting analyzer.
//!
//! Holds the meeting/summary models, the error type, calendar timestamp
//! parsing, display formatting and the command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{MeetingError, Result};
