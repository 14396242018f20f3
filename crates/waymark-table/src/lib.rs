//! # waymark-table
//!
//! Tabular data layer for the waymark roadmap engine.
//!
//! This crate provides:
//! - `ProjectTable`: an in-memory, versioned table of string cells
//! - `ColumnProfile` / `ResolvedColumns`: configurable header detection
//! - CSV ingest and filtered CSV export
//! - Portfolio revenue metrics (`kpi_summary`, `revenue_by`, `top_projects`)
//!
//! Cells stay untyped strings here. Date normalization belongs to
//! `waymark-timeline`; this crate only decides *which* columns matter and
//! hands rows downstream as [`waymark_core::ProjectRecord`]s.
//!
//! ## Example
//!
//! ```rust
//! use waymark_table::{ColumnProfile, ProjectTable};
//!
//! let table = ProjectTable::from_rows(
//!     vec!["Project", "DV Date", "Order Start"],
//!     vec![vec!["falcon-oled", "2025-03-14", "2025Q4"]],
//! );
//! let columns = ColumnProfile::default().resolve(table.headers()).unwrap();
//! let records = table.records(&columns);
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].project, "falcon-oled");
//! ```

pub mod columns;
pub mod io;
pub mod metrics;
pub mod table;

pub use columns::{find_column, find_named, ColumnProfile, ResolvedColumns, RevenueRule};
pub use io::{export_csv, load_csv, read_csv};
pub use metrics::{kpi_summary, parse_amount, revenue_by, top_projects, KpiSummary};
pub use table::{ProjectTable, RowFilter, TableVersion};

use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors from table loading, configuration, and mutation.
///
/// Anything *recoverable* (an unparseable cell, a missing milestone column)
/// is handled by degrading the affected feature instead; these variants are
/// the catastrophic class that aborts the current operation.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid column profile: {0}")]
    Profile(#[from] toml::de::Error),

    #[error("No project column found (candidates: {candidates:?})")]
    MissingProjectColumn { candidates: Vec<String> },

    #[error("Row {row} out of bounds (table has {rows} rows)")]
    RowOutOfBounds { row: usize, rows: usize },

    #[error("Column {col} out of bounds (table has {cols} columns)")]
    ColumnOutOfBounds { col: usize, cols: usize },
}
