//! Data layer: core types, loading, caching and filtering.
//!
//! Architecture:
//! ```text
//!  .xlsx / .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → RawTable → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  cache    │  Arc<Dataset> shared for one TTL window
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  department / cluster / winners → filtered Dataset
//!   └──────────┘
//! ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
