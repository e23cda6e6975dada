//! Terminal UI layer for the meeting analyzer.
//!
//! Provides themes, the report header, summary and subject tables, chart
//! datasets and renderers, and the application event loop built on top of
//! [`ratatui`] for browsing a [`meeting_data::analysis::MeetingAnalysis`].

pub mod app;
pub mod charts;
pub mod components;
pub mod table_view;
pub mod themes;

pub use meeting_core as core;
