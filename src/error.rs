use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

pub const DATA_HINT: &str = "make sure the CSV files are in the data directory";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Data unavailable: {what} ({hint})")]
    DataUnavailable { what: String, hint: &'static str },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chart rendering failed: {0}")]
    Chart(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ReportError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        ReportError::Chart(e.to_string())
    }
}

impl ReportError {
    pub fn unavailable(what: impl Into<String>) -> Self {
        ReportError::DataUnavailable {
            what: what.into(),
            hint: DATA_HINT,
        }
    }
}
