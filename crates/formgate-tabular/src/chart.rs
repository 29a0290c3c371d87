//! Chart preparation.
//!
//! Picks a label column and a value column from the first row, then turns
//! at most [`MAX_CHART_ROWS`] rows into a series a chart surface can draw.

use crate::rows::{cell_text, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Rows beyond this are not charted
pub const MAX_CHART_ROWS: usize = 15;

/// First-row numbers below this still count as labels
const LABEL_NUMBER_CEILING: f64 = 1000.0;

/// Chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Line series
    Line,
    /// Pie with percentage legend
    Pie,
    /// Bars
    Bar,
}

impl ChartKind {
    /// All kinds, in display order
    pub const ALL: [Self; 3] = [Self::Line, Self::Pie, Self::Bar];

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Bar => "bar",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown chart kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chart kind: {0} (expected line, pie or bar)")]
pub struct UnknownChartKind(pub String);

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownChartKind(s.to_string()))
    }
}

/// Columns chosen for a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSelection {
    /// Category axis
    pub label: String,
    /// Numeric axis
    pub value: String,
}

fn is_label_like(value: &Value) -> bool {
    match value {
        Value::String(_) => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f < LABEL_NUMBER_CEILING),
        _ => false,
    }
}

fn is_nonzero_number(value: &Value) -> bool {
    value.as_f64().is_some_and(|f| f != 0.0)
}

/// Pick label and value columns from the first row
///
/// The label is the first string (or small number) column, the value the
/// first non-zero numeric column. Without a label the first column is used;
/// without a value, the first other numeric column, else the second column,
/// else the first. Returns `None` when there are no rows or columns.
#[must_use]
pub fn select_columns(rows: &[Row]) -> Option<ColumnSelection> {
    let first = rows.first()?;
    let columns: Vec<&String> = first.keys().collect();
    let head = (*columns.first()?).clone();

    let mut label = None;
    let mut value = None;
    for (col, cell) in first {
        if label.is_none() && is_label_like(cell) {
            label = Some(col.clone());
        }
        if value.is_none() && is_nonzero_number(cell) {
            value = Some(col.clone());
        }
        if label.is_some() && value.is_some() {
            break;
        }
    }

    let label = label.unwrap_or_else(|| head.clone());
    let value = value.unwrap_or_else(|| {
        first
            .iter()
            .find(|(col, cell)| **col != label && cell.is_number())
            .map(|(col, _)| col.clone())
            .or_else(|| columns.get(1).map(|c| (*c).clone()))
            .unwrap_or(head)
    });

    Some(ColumnSelection { label, value })
}

/// Numeric reading of a cell; unparseable text and missing cells count as 1
fn numeric(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(1.0),
        Some(Value::String(s)) if s.trim().is_empty() => 0.0,
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(1.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Null) => 0.0,
        Some(_) | None => 1.0,
    }
}

/// Everything needed to draw one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    /// Chart type
    pub kind: ChartKind,
    /// `{value} by {label}`
    pub title: String,
    /// Chosen columns
    pub columns: ColumnSelection,
    /// Category labels, one per point
    pub labels: Vec<String>,
    /// Values, one per point
    pub values: Vec<f64>,
}

impl ChartConfig {
    /// Sum of all values
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Percentage of the total at `index`, as shown in pie legends
    #[must_use]
    pub fn share(&self, index: usize) -> Option<f64> {
        let value = *self.values.get(index)?;
        let total = self.total();
        Some(if total == 0.0 { 0.0 } else { value / total * 100.0 })
    }

    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// No points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build a chart from the first [`MAX_CHART_ROWS`] rows
///
/// Returns `None` if there is nothing to chart.
#[must_use]
pub fn prepare_chart(rows: &[Row], kind: ChartKind) -> Option<ChartConfig> {
    let columns = select_columns(rows)?;
    let window = &rows[..rows.len().min(MAX_CHART_ROWS)];

    let labels = window
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let text = row.get(&columns.label).map(cell_text).unwrap_or_default();
            if text.is_empty() {
                format!("Item {}", i + 1)
            } else {
                text
            }
        })
        .collect();
    let values = window.iter().map(|row| numeric(row.get(&columns.value))).collect();

    Some(ChartConfig {
        kind,
        title: format!("{} by {}", columns.value, columns.label),
        columns,
        labels,
        values,
    })
}

/// Identifies a drawn chart so it can be destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle(pub u64);

/// Drawing surface for charts
pub trait ChartRenderer {
    /// Draw a chart and return its handle
    fn draw(&mut self, config: &ChartConfig) -> ChartHandle;

    /// Remove a previously drawn chart
    fn destroy(&mut self, handle: ChartHandle);
}

/// Hands out handles and draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChartRenderer {
    next: u64,
}

impl ChartRenderer for NullChartRenderer {
    fn draw(&mut self, _config: &ChartConfig) -> ChartHandle {
        self.next += 1;
        ChartHandle(self.next)
    }

    fn destroy(&mut self, _handle: ChartHandle) {}
}
