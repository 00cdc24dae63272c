//! Interactive CSV dashboard: load a table, inspect it, filter numeric
//! columns by range, chart columns and download the filtered rows.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
