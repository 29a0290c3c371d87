//! formgate tabular
//!
//! Loads rows from a CSV source through an external parser, drops blank
//! rows, builds a table view and prepares charts from the first rows.
//!
//! Parsing itself sits behind [`TableParser`]; this crate only checks the
//! source, types cells with [`infer_cell`] and works on the resulting
//! [`Row`]s.

pub mod chart;
pub mod error;
pub mod loader;
pub mod rows;
pub mod source;
pub mod table;

pub use chart::{
    prepare_chart, select_columns, ChartConfig, ChartHandle, ChartKind, ChartRenderer,
    ColumnSelection, NullChartRenderer, MAX_CHART_ROWS,
};
pub use error::{LoadError, ParseError};
pub use loader::{DataLoader, Status, StatusKind};
pub use rows::{filter_blank_rows, is_blank_row, Row};
pub use source::{infer_cell, ParseOptions, Source, TableParser};
pub use table::{NullTableRenderer, TableRenderer, TableView};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
