//! Table views over loaded rows.

use crate::rows::{cell_text, Row};
use serde::Serialize;

/// Rendered-ready table: headers, string cells and a summary line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    /// Column names, taken from the first row
    pub columns: Vec<String>,
    /// One string per column per row; null cells are empty
    pub cells: Vec<Vec<String>>,
    /// `Source: {source} | Rows: {n} | Columns: {m}`
    pub summary: String,
}

impl TableView {
    /// Build a view; later rows are read by the first row's columns
    #[must_use]
    pub fn from_rows(rows: &[Row], source: &str) -> Self {
        let columns: Vec<String> = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();

        let cells = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| row.get(col).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        let summary = format!(
            "Source: {source} | Rows: {} | Columns: {}",
            rows.len(),
            columns.len()
        );

        Self {
            columns,
            cells,
            summary,
        }
    }

    /// Number of data rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Plain-text rendering with padded columns
    #[must_use]
    pub fn to_text(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.cells
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(col.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |values: &[String]| {
            values
                .iter()
                .zip(&widths)
                .map(|(v, w)| format!("{v:<w$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&line(&self.columns));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.push('\n');
        for row in &self.cells {
            out.push_str(&line(row));
            out.push('\n');
        }
        out.push_str(&self.summary);
        out.push('\n');
        out
    }
}

/// Presentation surface for tables
pub trait TableRenderer {
    /// Show a table, replacing any previous one
    fn render(&mut self, view: &TableView);

    /// Remove the table
    fn clear(&mut self);
}

/// Discards tables
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTableRenderer;

impl TableRenderer for NullTableRenderer {
    fn render(&mut self, _view: &TableView) {}

    fn clear(&mut self) {}
}
