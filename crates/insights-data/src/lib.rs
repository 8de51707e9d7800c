//! Data ingestion layer for Campaign Insights.
//!
//! Responsible for reading the ad and web-traffic CSV files into typed
//! datasets and running the metrics pipeline that produces a
//! [`analysis::MetricsSnapshot`].

pub mod analysis;
pub mod reader;

pub use insights_core as core;
