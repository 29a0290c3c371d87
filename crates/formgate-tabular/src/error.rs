//! Error types for tabular loading

/// Why a load request could not proceed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// URL input blank after trimming
    #[error("Please enter a URL")]
    EmptyUrl,

    /// URL input does not parse as an absolute URL
    #[error("Please enter a valid URL")]
    InvalidUrl(String),

    /// File does not look like CSV
    #[error("Please select a valid CSV file")]
    NotCsv(String),

    /// External parser failed
    #[error("Error loading data: {0}")]
    Parse(#[from] ParseError),
}

/// Failure reported by a [`crate::source::TableParser`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// Parser diagnostic
    pub message: String,
}

impl ParseError {
    /// Wrap a parser message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
