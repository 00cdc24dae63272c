//! Data layer: core types, loading, statistics, filtering, charts and export.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file → Dataset (dtype per column)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset  │──► stats   preview / info / describe
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  numeric ranges → filtered Dataset
//!   └──────────┘
//!        │
//!        ├──► chart   line / count / histogram + KDE
//!        └──► export  filtered_data.csv
//! ```
pub mod chart;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
