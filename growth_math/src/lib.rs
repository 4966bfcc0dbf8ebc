//! # Growth Math
//!
//! Exact-decimal growth calculations for recursive time series projection.
//! This crate derives a single representative growth rate from a series of
//! historical values, either as the arithmetic mean of period-over-period
//! changes or as a compound annual growth rate.

use thiserror::Error;

pub mod growth;

pub use growth::{average_growth_rate, compound_annual_growth_rate, period_growth_rate};

/// Errors that can occur in growth calculations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for growth math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Minimum number of observations any growth estimate needs
pub const MIN_OBSERVATIONS: usize = 2;
