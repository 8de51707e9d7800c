//! Runtime layer for Campaign Insights.
//!
//! Holds the caller-managed dataset cache and the interactive filter session
//! that sit between the data layer and the UI.

pub mod data_manager;
pub mod filter_session;

pub use insights_core as core;
pub use insights_data as data;
