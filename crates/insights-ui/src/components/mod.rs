//! Reusable line-oriented widgets for the dashboard.

pub mod bar_chart;
pub mod filter_panel;
pub mod header;
pub mod kpi_cards;
