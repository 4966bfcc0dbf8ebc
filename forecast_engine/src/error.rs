//! Error types for the forecast_engine crate

use growth_math::MathError;
use thiserror::Error;

/// Custom error types for the forecast_engine crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Fewer historical observations than a forecast needs
    #[error("Insufficient data: at least {required} historical points are required, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Recursion would nest deeper than the configured bound
    #[error("Recursion depth {depth} exceeds the configured limit of {limit}")]
    DepthExceeded { depth: usize, limit: usize },

    /// Timestamps are not usable as a fixed-cadence series
    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A decimal result left the representable range
    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    /// Error from growth estimation
    #[error("Math error: {0}")]
    Math(MathError),

    /// Error while parsing configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        ForecastError::Math(err)
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::Config(err.to_string())
    }
}

impl ForecastError {
    /// Whether the error is the short-history failure every strategy shares
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, ForecastError::InsufficientData { .. })
    }
}
