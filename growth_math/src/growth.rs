//! Growth rate estimators
//!
//! Contains the two estimators used to turn a historical series into a
//! single per-period growth rate:
//! - Arithmetic mean of period-over-period growth rates
//! - Compound annual growth rate (CAGR)
//!
//! All arithmetic is exact decimal except the fractional exponent in CAGR,
//! which goes through `f64` and is rounded back into a `Decimal`.

use crate::{MathError, Result, MIN_OBSERVATIONS};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Relative change from `previous` to `current`.
///
/// Returns `None` when `previous` is zero, since the change is undefined.
pub fn period_growth_rate(previous: Decimal, current: Decimal) -> Result<Option<Decimal>> {
    if previous.is_zero() {
        return Ok(None);
    }

    let delta = current.checked_sub(previous).ok_or_else(|| {
        MathError::CalculationError(format!("{} - {} overflows", current, previous))
    })?;

    delta
        .checked_div(previous)
        .map(Some)
        .ok_or_else(|| MathError::CalculationError(format!("{} / {} overflows", delta, previous)))
}

/// Arithmetic mean of the period-over-period growth rates in `values`.
///
/// Pairs whose earlier value is zero are skipped. If no pair is usable
/// (for example an all-zero series) the mean is zero.
///
/// # Errors
/// * `MathError::InsufficientData` when fewer than two values are given
pub fn average_growth_rate(values: &[Decimal]) -> Result<Decimal> {
    if values.len() < MIN_OBSERVATIONS {
        return Err(MathError::InsufficientData(format!(
            "average growth rate needs at least {} values, got {}",
            MIN_OBSERVATIONS,
            values.len()
        )));
    }

    let mut total = Decimal::ZERO;
    let mut periods: u32 = 0;

    for pair in values.windows(2) {
        if let Some(rate) = period_growth_rate(pair[0], pair[1])? {
            total = total.checked_add(rate).ok_or_else(|| {
                MathError::CalculationError("sum of growth rates overflows".to_string())
            })?;
            periods += 1;
        }
    }

    if periods == 0 {
        return Ok(Decimal::ZERO);
    }

    total
        .checked_div(Decimal::from(periods))
        .ok_or_else(|| MathError::CalculationError("mean growth rate overflows".to_string()))
}

/// Compound annual growth rate: `(last / first)^(1 / (n - 1)) - 1`.
///
/// A series shorter than two values, or one whose first value is not
/// positive, has no discernible trend and yields zero rather than an error.
///
/// The fractional power is computed in `f64`, so the result carries
/// binary rounding error of the order of `1e-15`.
///
/// # Errors
/// * `MathError::CalculationError` when the ratio cannot be represented or
///   the power is not a real number (a negative ratio over several periods)
pub fn compound_annual_growth_rate(values: &[Decimal]) -> Result<Decimal> {
    let (first, last) = match (values.first(), values.last()) {
        (Some(first), Some(last)) if values.len() >= MIN_OBSERVATIONS => (*first, *last),
        _ => return Ok(Decimal::ZERO),
    };

    if first <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let periods = (values.len() - 1) as f64;

    let ratio = last
        .checked_div(first)
        .and_then(|r| r.to_f64())
        .ok_or_else(|| {
            MathError::CalculationError(format!("ratio {} / {} is not representable", last, first))
        })?;

    let growth = ratio.powf(1.0 / periods);
    if !growth.is_finite() {
        return Err(MathError::CalculationError(format!(
            "CAGR of ratio {} over {} periods is not a real number",
            ratio, periods
        )));
    }

    Decimal::from_f64(growth)
        .map(|g| g - Decimal::ONE)
        .ok_or_else(|| MathError::CalculationError(format!("{} is not representable", growth)))
}
