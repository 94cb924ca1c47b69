//! Filtering, aggregation and ranking pipeline behind the sales progress
//! dashboard.
//!
//! ```text
//!  DatasetCache::load ──► filter::apply ──► kpi::summarize
//!         │                     └─────────► ranking::build
//!         └───────────────────────────────► departments::build
//! ```

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod report;

pub use error::{DashboardError, DashboardResult};
