//! Row sources and the external parser seam.

use crate::error::{LoadError, ParseError};
use crate::rows::Row;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Where rows come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Local file; must have a `.csv` extension
    File(PathBuf),
    /// Remote file, downloaded by the parser
    Url(Url),
}

impl Source {
    /// File source, checked for a `.csv` extension (case-insensitive)
    ///
    /// # Errors
    /// `NotCsv` for any other extension.
    pub fn file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv {
            Ok(Self::File(path.to_path_buf()))
        } else {
            Err(LoadError::NotCsv(path.display().to_string()))
        }
    }

    /// URL source from raw user input
    ///
    /// # Errors
    /// `EmptyUrl` for blank input, `InvalidUrl` if it does not parse.
    pub fn url(input: &str) -> Result<Self, LoadError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LoadError::EmptyUrl);
        }
        Url::parse(trimmed)
            .map(Self::Url)
            .map_err(|_| LoadError::InvalidUrl(trimmed.to_string()))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Options handed to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// First line holds column names
    pub header: bool,
    /// Drop lines with no content
    pub skip_empty_lines: bool,
    /// Convert numeric and boolean cells
    pub dynamic_typing: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            header: true,
            skip_empty_lines: true,
            dynamic_typing: true,
        }
    }
}

/// External CSV parser
pub trait TableParser {
    /// Parse `source` into rows keyed by column name
    ///
    /// # Errors
    /// Any parser failure.
    fn parse(&mut self, source: &Source, options: &ParseOptions) -> Result<Vec<Row>, ParseError>;
}

/// Dynamic typing for string cells: booleans, numbers, empty to null
#[must_use]
pub fn infer_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(raw.to_string()), Value::Number)
}
