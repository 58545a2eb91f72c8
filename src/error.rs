use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to parse uploaded data: {0}")]
    Parse(String),

    #[error("{message}")]
    SchemaValidation {
        chart: String,
        missing: Vec<String>,
        message: String,
    },

    #[error("incomplete chart request: {0}")]
    IncompleteRequest(String),

    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    #[error("column `{0}` is not numeric")]
    NonNumericColumn(String),

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChartError {
    /// True for failures the dashboard reports inline instead of aborting.
    #[must_use]
    pub fn is_schema_validation(&self) -> bool {
        matches!(self, Self::SchemaValidation { .. })
    }
}
