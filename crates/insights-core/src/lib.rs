//! Core types for Campaign Insights.
//!
//! Holds the record and aggregate models, the error type, the pure metrics
//! engine, display formatting helpers, and the command-line settings.

pub mod error;
pub mod formatting;
pub mod metrics;
pub mod models;
pub mod settings;

pub use error::{InsightsError, Result};
