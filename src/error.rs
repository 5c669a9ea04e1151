use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("table must contain at least one row")]
    EmptyTable,

    #[error("unknown series: `{0}`")]
    UnknownSeries(String),

    #[error("failed to parse `{raw}` in column `{column}`: {reason}")]
    FieldParse {
        column: String,
        raw: String,
        reason: String,
    },
}
