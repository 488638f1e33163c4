//! Last-mile delivery dashboard
//!
//! Loads the delivery table, cleans it once, and recomputes the summary
//! metrics and chart aggregates for every Area/Vehicle selection.

pub mod aggregate;
pub mod api;
pub mod cleaning;
pub mod config;
pub mod dataset;
pub mod filter;
pub mod late;
pub mod loader;
pub mod models;
pub mod report;
