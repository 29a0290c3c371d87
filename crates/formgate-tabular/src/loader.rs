//! Load flow: source check, parse, filter, present, chart.

use crate::chart::{prepare_chart, ChartConfig, ChartHandle, ChartKind, ChartRenderer};
use crate::error::LoadError;
use crate::rows::{filter_blank_rows, Row};
use crate::source::{ParseOptions, Source, TableParser};
use crate::table::{TableRenderer, TableView};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Status shown for a parse that produced no rows at all
pub const EMPTY_FILE_MESSAGE: &str = "The file is empty or could not be processed";

/// Status shown when every parsed row was blank
pub const NO_VALID_DATA_MESSAGE: &str = "The file contains no valid data";

/// Status shown when charting without rows
pub const NO_CHART_DATA_MESSAGE: &str = "No data to chart";

/// Status severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Neutral progress
    Info,
    /// Load or chart succeeded
    Success,
    /// Something failed
    Error,
}

/// Current status line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    /// Severity
    pub kind: StatusKind,
    /// Text shown to the user
    pub message: String,
}

impl Status {
    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            message: message.into(),
        }
    }

    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::info("")
    }
}

/// Owns the loaded rows and drives the table and chart surfaces
pub struct DataLoader<P, T, C> {
    parser: P,
    table: T,
    charts: C,
    options: ParseOptions,
    rows: Vec<Row>,
    chart: Option<ChartHandle>,
    status: Status,
}

impl<T, C> DataLoader<(), T, C>
where
    T: TableRenderer,
    C: ChartRenderer,
{
    /// Loader for rows parsed elsewhere; only [`DataLoader::ingest`] applies
    pub fn without_parser(table: T, charts: C) -> Self {
        Self::new((), table, charts)
    }
}

impl<P, T, C> DataLoader<P, T, C>
where
    P: TableParser,
    T: TableRenderer,
    C: ChartRenderer,
{
    /// Override parse options
    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse `source` and present the result
    ///
    /// On any failure the previous rows are kept and the status holds the
    /// error text.
    pub fn load(&mut self, source: &Source) -> &Status {
        self.status = Status::info(format!("Loading {source}..."));
        debug!(%source, "Loading rows");

        match self.parser.parse(source, &self.options) {
            Ok(rows) => self.ingest(rows, &source.to_string()),
            Err(err) => self.fail(&LoadError::Parse(err)),
        }
    }

    /// Check a URL input and load it
    pub fn load_url(&mut self, input: &str) -> &Status {
        match Source::url(input) {
            Ok(source) => self.load(&source),
            Err(err) => self.fail(&err),
        }
    }

    /// Check a file path and load it
    pub fn load_file(&mut self, path: impl AsRef<std::path::Path>) -> &Status {
        match Source::file(path) {
            Ok(source) => self.load(&source),
            Err(err) => self.fail(&err),
        }
    }
}

impl<P, T, C> DataLoader<P, T, C>
where
    T: TableRenderer,
    C: ChartRenderer,
{
    /// New loader with default parse options
    pub fn new(parser: P, table: T, charts: C) -> Self {
        Self {
            parser,
            table,
            charts,
            options: ParseOptions::default(),
            rows: Vec::new(),
            chart: None,
            status: Status::default(),
        }
    }

    /// Present already-parsed rows under `source_name`
    pub fn ingest(&mut self, rows: Vec<Row>, source_name: &str) -> &Status {
        if rows.is_empty() {
            warn!(source = source_name, "Parser returned no rows");
            self.status = Status::error(EMPTY_FILE_MESSAGE);
            return &self.status;
        }

        let parsed = rows.len();
        let rows = filter_blank_rows(rows);
        if rows.is_empty() {
            warn!(source = source_name, parsed, "Every row was blank");
            self.status = Status::error(NO_VALID_DATA_MESSAGE);
            return &self.status;
        }

        let view = TableView::from_rows(&rows, source_name);
        self.table.render(&view);
        self.rows = rows;
        info!(
            source = source_name,
            rows = self.rows.len(),
            dropped = parsed - self.rows.len(),
            "Rows loaded"
        );
        self.status = Status::success(format!("Loaded {} rows", self.rows.len()));
        &self.status
    }

    /// Draw a chart of the current rows, replacing any previous chart
    pub fn chart(&mut self, kind: ChartKind) -> Option<ChartConfig> {
        let Some(config) = prepare_chart(&self.rows, kind) else {
            self.status = Status::error(NO_CHART_DATA_MESSAGE);
            return None;
        };

        if let Some(previous) = self.chart.take() {
            self.charts.destroy(previous);
        }
        self.chart = Some(self.charts.draw(&config));
        debug!(kind = %kind, title = %config.title, points = config.len(), "Chart drawn");
        self.status = Status::success(format!("{} chart created", capitalize(kind.as_str())));
        Some(config)
    }

    /// Drop rows, table and chart
    pub fn clear(&mut self) {
        self.rows.clear();
        self.table.clear();
        if let Some(handle) = self.chart.take() {
            self.charts.destroy(handle);
        }
        self.status = Status::info("Data cleared");
    }

    /// Current status
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Rows currently loaded
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Table surface
    pub fn table(&self) -> &T {
        &self.table
    }

    /// Chart surface
    pub fn charts(&self) -> &C {
        &self.charts
    }

    /// Handle of the chart on screen
    pub fn current_chart(&self) -> Option<ChartHandle> {
        self.chart
    }

    fn fail(&mut self, err: &LoadError) -> &Status {
        warn!(error = %err, "Load failed");
        self.status = Status::error(err.to_string());
        &self.status
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|c| c.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
