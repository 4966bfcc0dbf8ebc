//! Forecast accuracy against held-out actuals

use crate::data::TimeSeriesPoint;
use crate::error::{ForecastError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Error of one aligned (actual, forecasted) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccuracyRow {
    /// 1-based position in the compared sequences
    pub period: usize,
    pub actual: Decimal,
    pub forecasted: Decimal,
    /// `|actual - forecasted|`
    pub absolute_error: Decimal,
    /// Absolute error as a percentage of `|actual|`; zero when actual is zero
    pub percentage_error: Decimal,
}

/// Accuracy statistics over all aligned pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccuracyReport {
    pub rows: Vec<AccuracyRow>,
    /// Mean Absolute Error
    pub mean_absolute_error: Decimal,
    /// Mean percentage error, in percent
    pub mean_percentage_error: Decimal,
}

/// Compare forecasted values against actual values point by point.
///
/// Sequences of different lengths are not comparable: a warning is logged
/// and no statistics are returned. Two empty sequences also yield `None`.
///
/// # Errors
/// * `ForecastError::ArithmeticOverflow` if an error term leaves the decimal range
pub fn forecast_accuracy(
    actual: &[TimeSeriesPoint],
    forecasted: &[TimeSeriesPoint],
) -> Result<Option<AccuracyReport>> {
    if actual.len() != forecasted.len() {
        warn!(
            actual = actual.len(),
            forecasted = forecasted.len(),
            "actual and forecasted data sets have different lengths"
        );
        return Ok(None);
    }

    if actual.is_empty() {
        debug!("no pairs to compare");
        return Ok(None);
    }

    let overflow = |what: &str| ForecastError::ArithmeticOverflow(format!("accuracy {}", what));

    let mut rows = Vec::with_capacity(actual.len());
    let mut total_error = Decimal::ZERO;
    let mut total_percentage = Decimal::ZERO;

    for (i, (a, f)) in actual.iter().zip(forecasted).enumerate() {
        let (actual_value, forecasted_value) = (a.value(), f.value());

        let absolute_error = actual_value
            .checked_sub(forecasted_value)
            .ok_or_else(|| overflow("error term"))?
            .abs();

        let percentage_error = if actual_value.is_zero() {
            Decimal::ZERO
        } else {
            absolute_error
                .checked_div(actual_value.abs())
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or_else(|| overflow("percentage error"))?
        };

        total_error = total_error
            .checked_add(absolute_error)
            .ok_or_else(|| overflow("total error"))?;
        total_percentage = total_percentage
            .checked_add(percentage_error)
            .ok_or_else(|| overflow("total percentage error"))?;

        rows.push(AccuracyRow {
            period: i + 1,
            actual: actual_value,
            forecasted: forecasted_value,
            absolute_error,
            percentage_error,
        });
    }

    let n = Decimal::from(rows.len());
    Ok(Some(AccuracyReport {
        mean_absolute_error: total_error / n,
        mean_percentage_error: total_percentage / n,
        rows,
    }))
}

impl fmt::Display for AccuracyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Period\tActual\t\tForecasted\tError\t\tError%")?;
        writeln!(f, "{}", "-".repeat(60))?;
        for row in &self.rows {
            writeln!(
                f,
                "{}\t${:.2}\t\t${:.2}\t\t${:.2}\t\t{:.2}%",
                row.period, row.actual, row.forecasted, row.absolute_error, row.percentage_error
            )?;
        }
        writeln!(f, "{}", "-".repeat(60))?;
        writeln!(f, "Mean Absolute Error: ${:.2}", self.mean_absolute_error)?;
        write!(f, "Mean Percentage Error: {:.2}%", self.mean_percentage_error)
    }
}
