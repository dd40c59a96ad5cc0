/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: need {required} prices, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Duplicate date {date} for symbol {symbol}")]
    DuplicateDate { symbol: String, date: String },

    #[error("Non-finite metric for {symbol} on {date}")]
    NonFiniteMetric { symbol: String, date: String },

    #[error("No valid rows for symbol {0}")]
    NoValidRows(String),

    #[error("Symbol {symbol} failed: {source}")]
    SymbolFailed {
        symbol: String,
        #[source]
        source: Box<MetricsError>,
    },

    #[error("Empty input: price table has no rows")]
    EmptyInput,

    #[error("Missing required columns: expected {expected:?}, found {found:?}")]
    MissingColumns {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Task error: {0}")]
    TaskError(String),
}

impl MetricsError {
    /// 심볼 단위로 복구 가능한 데이터 품질 오류인지 여부
    pub fn is_data_quality(&self) -> bool {
        matches!(
            self,
            MetricsError::InvalidInput(_)
                | MetricsError::DuplicateDate { .. }
                | MetricsError::NonFiniteMetric { .. }
                | MetricsError::NoValidRows(_)
                | MetricsError::CalculationError(_)
        )
    }
}
