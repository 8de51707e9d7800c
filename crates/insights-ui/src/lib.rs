//! Presentation layer for Campaign Insights.
//!
//! Provides themes, line-oriented components, the dashboard and detail table
//! views, the interactive event loop built on [`ratatui`], and the text
//! exports (summary, slide deck, JSON snapshot).

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod export;
pub mod table_view;
pub mod themes;

pub use insights_runtime as runtime;
